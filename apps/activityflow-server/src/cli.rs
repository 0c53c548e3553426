use activityflow_db::repositories::user_repo::UserRepository;
use anyhow::{Context, Result, bail};
use sqlx::PgPool;

use crate::services::password::PasswordHasher;
use crate::validation;

pub async fn reset_password(pool: &PgPool, hasher: PasswordHasher, email: &str, new_pass: &str) -> Result<()> {
    let problems = validation::password_violations(new_pass);
    if !problems.is_empty() {
        bail!("{}", problems.join(" "));
    }

    let users = UserRepository::new(pool.clone());
    let user = users
        .get_by_email(email)
        .await?
        .with_context(|| format!("No user with email {email}"))?;

    let hash = hasher.hash(new_pass)?;
    users.set_password_hash(user.id, &hash).await?;
    println!("Password for '{}' has been successfully reset.", user.email);
    Ok(())
}

pub async fn grant_role(pool: &PgPool, email: &str, role: &str) -> Result<()> {
    let users = UserRepository::new(pool.clone());
    if !users.role_exists(role).await? {
        bail!("Unknown role '{role}'");
    }
    let user = users
        .get_by_email(email)
        .await?
        .with_context(|| format!("No user with email {email}"))?;

    users.add_role(user.id, role).await?;
    println!("Granted role '{}' to '{}'.", role, user.email);
    Ok(())
}
