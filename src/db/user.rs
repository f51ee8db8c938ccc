use color_eyre::Result;
use ulid::Ulid;

use super::models::User;
use super::Db;

impl Db {
    pub async fn create_user(&self, display_name: &str) -> Result<User> {
        let id = Ulid::new().to_string();

        sqlx::query("INSERT INTO users (id, display_name) VALUES (?, ?)")
            .bind(&id)
            .bind(display_name)
            .execute(&self.pool)
            .await?;

        tracing::info!("new user created: id={id}");
        Ok(User {
            id,
            display_name: display_name.to_string(),
        })
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, display_name FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}
