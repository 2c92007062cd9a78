//! Dispatch gate based on the workflow activity of the run.

use tracing::debug;

use super::types::ExecutionContext;

/// Attribute holding the workflow activity (e.g. `deploy`, `setup`, `configure`).
pub const ACTIVITY_ATTRIBUTE: &str = "opsworks.activity";

/// Closed allow-list over the run's workflow activity.
pub struct ActivityFilter;

impl ActivityFilter {
    /// Decide whether a notification should be dispatched.
    ///
    /// Without an allow-list (or with an empty one) everything is dispatched.
    /// With an allow-list, a run without an activity attribute is not dispatched.
    pub fn should_dispatch(context: &ExecutionContext, allow_list: Option<&[String]>) -> bool {
        let allow_list = match allow_list {
            Some(list) if !list.is_empty() => list,
            _ => return true,
        };

        match context.attribute_str(ACTIVITY_ATTRIBUTE) {
            Some(activity) => {
                let allowed = allow_list.iter().any(|a| *a == activity);
                debug!("Activity '{}' allowed={}", activity, allowed);
                allowed
            }
            None => {
                debug!("No {} attribute; filtering out", ACTIVITY_ATTRIBUTE);
                false
            }
        }
    }
}
