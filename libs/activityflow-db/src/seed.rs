use activityflow_shared::ActivityStatus;
use activityflow_shared::category::DEFAULT_COLOR;
use activityflow_shared::user::{ROLE_ADMIN, ROLE_MANAGER, ROLE_USER, ROLES};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::activity::NewActivity;
use crate::models::user::NewUser;
use crate::repositories::activity_repo::ActivityRepository;
use crate::repositories::category_repo::CategoryRepository;
use crate::repositories::status_repo::StatusRepository;
use crate::repositories::user_repo::UserRepository;

pub const DEMO_PASSWORD: &str = "User123!";

pub const DEMO_CATEGORIES: [&str; 10] = [
    "Work",
    "Personal",
    "Health",
    "Finance",
    "Education",
    "Shopping",
    "Travel",
    "Home",
    "Hobbies",
    "Miscellaneous",
];

const DEMO_ACTIVITIES: usize = 20;

/// A demo account: user name, email and its single role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoUser {
    pub user_name: String,
    pub email: String,
    pub role: &'static str,
}

pub fn demo_users() -> Vec<DemoUser> {
    let mut names = vec![
        ("admin1".to_string(), ROLE_ADMIN),
        ("manager1".to_string(), ROLE_MANAGER),
    ];
    names.extend((1..=8).map(|i| (format!("user{i}"), ROLE_USER)));
    names
        .into_iter()
        .map(|(user_name, role)| DemoUser {
            email: format!("{user_name}@example.com"),
            user_name,
            role,
        })
        .collect()
}

/// Status applied to the `i`-th demo activity.
pub fn demo_status_for(i: usize) -> ActivityStatus {
    ActivityStatus::from_value((i % 5) as i32 + 1).unwrap_or(ActivityStatus::Pending)
}

/// The `i`-th demo activity. Owners and categories cycle through the given
/// ids; `user_ids` must not be empty.
pub fn demo_activity(
    i: usize,
    status_id: i64,
    user_ids: &[Uuid],
    category_ids: &[i64],
    now: DateTime<Utc>,
) -> NewActivity {
    NewActivity {
        title: format!("Activity {i}"),
        description: Some(format!("Description for activity {i}")),
        start_date: now,
        end_date: Some(now + Duration::days(7)),
        due_date: Some(now + Duration::days(i as i64)),
        priority: (i % 6) as i32,
        status_id,
        category_id: (!category_ids.is_empty()).then(|| category_ids[i % category_ids.len()]),
        user_id: user_ids[i % user_ids.len()],
        assigned_to_id: None,
    }
}

/// Ensures roles and statuses exist. When `demo_password_hash` is given,
/// also fills empty user, category and activity tables with demo data.
pub async fn seed(pool: &PgPool, demo_password_hash: Option<&str>) -> Result<()> {
    let users = UserRepository::new(pool.clone());
    let statuses = StatusRepository::new(pool.clone());

    for role in ROLES {
        users.ensure_role(role).await?;
    }
    for (order, status) in ActivityStatus::ALL.into_iter().enumerate() {
        statuses
            .ensure(status, status.default_description(), order as i32 + 1, status.default_color())
            .await?;
    }
    tracing::debug!("Roles and statuses ensured");

    if let Some(hash) = demo_password_hash {
        seed_demo(pool, hash).await?;
    }
    Ok(())
}

async fn seed_demo(pool: &PgPool, password_hash: &str) -> Result<()> {
    let users = UserRepository::new(pool.clone());
    let categories = CategoryRepository::new(pool.clone());
    let activities = ActivityRepository::new(pool.clone());
    let statuses = StatusRepository::new(pool.clone());

    if users.count().await? == 0 {
        for demo in demo_users() {
            users
                .create(
                    NewUser {
                        email: &demo.email,
                        user_name: &demo.user_name,
                        password_hash,
                        email_confirmed: true,
                    },
                    &[demo.role.to_string()],
                )
                .await
                .with_context(|| format!("Failed to seed user {}", demo.email))?;
        }
        tracing::info!("Seeded demo users");
    }

    if categories.count().await? == 0 {
        for name in DEMO_CATEGORIES {
            let description = format!("{name} related activities");
            categories
                .create(name, Some(description.as_str()), DEFAULT_COLOR)
                .await?;
        }
        tracing::info!("Seeded demo categories");
    }

    if activities.count().await? > 0 {
        return Ok(());
    }

    let user_ids: Vec<_> = users.get_all().await?.into_iter().map(|u| u.user.id).collect();
    let category_ids: Vec<_> = categories.get_all().await?.into_iter().map(|c| c.id).collect();
    if user_ids.is_empty() {
        return Ok(());
    }

    let now = Utc::now();
    for i in 1..=DEMO_ACTIVITIES {
        let status = statuses
            .get_by_name(demo_status_for(i))
            .await?
            .context("Statuses must be seeded before activities")?;
        activities
            .create(&demo_activity(i, status.id, &user_ids, &category_ids, now))
            .await?;
    }
    tracing::info!("Seeded {} demo activities", DEMO_ACTIVITIES);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_users_have_one_admin_and_one_manager() {
        let users = demo_users();
        assert_eq!(users.len(), 10);
        assert_eq!(
            users[0],
            DemoUser {
                user_name: "admin1".into(),
                email: "admin1@example.com".into(),
                role: ROLE_ADMIN,
            }
        );
        assert_eq!(users[1].user_name, "manager1");
        assert_eq!(users[1].role, ROLE_MANAGER);
        assert_eq!(users.iter().filter(|u| u.role == ROLE_USER).count(), 8);
        assert_eq!(users[9].user_name, "user8");
        assert_eq!(users[9].email, "user8@example.com");
    }

    #[test]
    fn demo_categories_are_the_ten_defaults() {
        assert_eq!(DEMO_CATEGORIES.len(), 10);
        assert_eq!(DEMO_CATEGORIES[0], "Work");
        assert_eq!(DEMO_CATEGORIES[9], "Miscellaneous");
        let mut unique = DEMO_CATEGORIES.to_vec();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn demo_activities_cycle_owners_and_categories() {
        let now = Utc::now();
        let users: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let categories = [11, 12];

        let first = demo_activity(1, 2, &users, &categories, now);
        assert_eq!(first.title, "Activity 1");
        assert_eq!(first.user_id, users[1]);
        assert_eq!(first.category_id, Some(12));
        assert_eq!(first.status_id, 2);
        assert_eq!(first.priority, 1);
        assert_eq!(first.due_date, Some(now + Duration::days(1)));
        assert_eq!(first.end_date, Some(now + Duration::days(7)));

        let fourth = demo_activity(4, 5, &users, &categories, now);
        assert_eq!(fourth.user_id, users[1]);
        assert_eq!(fourth.category_id, Some(11));

        let sixth = demo_activity(6, 2, &users, &categories, now);
        assert_eq!(sixth.user_id, users[0]);
        assert_eq!(sixth.priority, 0);
    }

    #[test]
    fn demo_activities_without_categories_are_uncategorized() {
        let users = [Uuid::new_v4()];
        assert_eq!(demo_activity(3, 1, &users, &[], Utc::now()).category_id, None);
    }

    #[test]
    fn demo_statuses_cycle_through_all_values() {
        assert_eq!(demo_status_for(1), ActivityStatus::InProgress);
        assert_eq!(demo_status_for(4), ActivityStatus::OnHold);
        assert_eq!(demo_status_for(5), ActivityStatus::Pending);
        assert_eq!(demo_status_for(20), ActivityStatus::Pending);
    }
}
