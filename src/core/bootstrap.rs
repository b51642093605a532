use uuid::Uuid;

use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;

const SUPERUSER_NAME: &str = "Super Admin";

/// Creates the configured admin account, or re-activates it and resyncs its password.
pub(crate) async fn ensure_superuser(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_superuser_password.is_empty() {
        tracing::warn!("FIRST_SUPERUSER_PASSWORD not configured; skipping superuser creation");
        return Ok(());
    }

    let email = admin.first_superuser_email.trim().to_ascii_lowercase();
    let now = primitive_now_utc();

    if let Some(user) = repositories::users::find_by_email(state.db(), &email).await? {
        if user.role != UserRole::Admin {
            tracing::warn!(
                email = %email,
                role = user.role.as_str(),
                "Superuser email belongs to a non-admin account; leaving it untouched"
            );
            return Ok(());
        }

        let password_matches =
            security::verify_password(&admin.first_superuser_password, &user.hashed_password)
                .unwrap_or(false);
        if password_matches && user.is_active {
            tracing::info!("Default superuser already up to date");
            return Ok(());
        }

        let hashed_password = if password_matches {
            None
        } else {
            Some(security::hash_password(&admin.first_superuser_password)?)
        };
        repositories::users::update(
            state.db(),
            &user.id,
            repositories::users::UpdateUser {
                name: None,
                is_active: Some(true),
                hashed_password,
                updated_at: now,
            },
        )
        .await?;

        tracing::info!(email = %email, "Updated default superuser");
        return Ok(());
    }

    let hashed_password = security::hash_password(&admin.first_superuser_password)?;
    repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            name: SUPERUSER_NAME,
            email: &email,
            hashed_password,
            role: UserRole::Admin,
            is_active: true,
            created_at: now,
            updated_at: now,
        },
    )
    .await?;

    tracing::info!(email = %email, "Created default superuser");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn superuser_is_created_once_and_reactivated() {
        let ctx = test_support::setup_test_context().await;
        let email = ctx.state.settings().admin().first_superuser_email.clone();

        ensure_superuser(&ctx.state).await.expect("create superuser");
        let created = repositories::users::find_by_email(ctx.state.db(), &email)
            .await
            .expect("lookup")
            .expect("superuser exists");
        assert_eq!(created.role, UserRole::Admin);
        assert_eq!(created.name, SUPERUSER_NAME);

        repositories::users::update(
            ctx.state.db(),
            &created.id,
            repositories::users::UpdateUser {
                name: None,
                is_active: Some(false),
                hashed_password: None,
                updated_at: primitive_now_utc(),
            },
        )
        .await
        .expect("deactivate");

        ensure_superuser(&ctx.state).await.expect("reactivate superuser");
        let reloaded = repositories::users::find_by_id(ctx.state.db(), &created.id)
            .await
            .expect("lookup")
            .expect("superuser exists");
        assert!(reloaded.is_active);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(ctx.state.db())
            .await
            .expect("count");
        assert_eq!(count, 1);
    }
}
