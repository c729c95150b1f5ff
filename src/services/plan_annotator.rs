use crate::models::{Plan, User, UserRecord};

/// Attaches each user's plan name by scanning the full plan list.
///
/// Every plan is visited, so if ids were ever duplicated the last match wins.
/// Users whose `plan_id` matches nothing get no `plan_name`.
pub fn annotate(users: Vec<User>, plans: &[Plan]) -> Vec<UserRecord> {
    users
        .into_iter()
        .map(|user| {
            let mut record = UserRecord::from(user);
            for plan in plans {
                if record.user.plan_id == Some(plan.id) {
                    record.plan_name = Some(plan.name.clone());
                }
            }
            record
        })
        .collect()
}
