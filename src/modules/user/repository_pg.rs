use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{
        model::{InsertUser, UserFilter},
        repository::UserRepository,
        schema::UserEntity,
    },
};

#[derive(Clone)]
pub struct UserRepositoryPg {
    pool: sqlx::PgPool,
}

impl UserRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn like_pattern(query: &str) -> String {
    let escaped = query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{escaped}%")
}

/// WHERE clause and its single bind value for a directory filter.
fn filter_clause(filter: &UserFilter) -> (&'static str, String) {
    match filter {
        UserFilter::Email(email) => ("lower(email) = lower($1)", email.clone()),
        UserFilter::Name(name) => {
            ("(lower(first_name) LIKE lower($1) OR lower(last_name) LIKE lower($1))", like_pattern(name))
        }
    }
}

#[async_trait::async_trait]
impl UserRepository for UserRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError> {
        let user =
            sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE lower(email) = lower($1)")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    async fn create(&self, user: &InsertUser) -> Result<Uuid, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        sqlx::query(
            "INSERT INTO users (id, email, hash_password, first_name, last_name) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(&user.email)
        .bind(&user.hash_password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<i64, error::SystemError> {
        let (clause, value) = filter_clause(filter);
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users WHERE {clause}"))
            .bind(value)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn search_users(
        &self,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let (clause, value) = filter_clause(filter);
        let sql = format!(
            r#"
            SELECT * FROM users
            WHERE {clause}
            ORDER BY created_at, id
            LIMIT $2 OFFSET $3
            "#
        );
        let users = sqlx::query_as::<_, UserEntity>(&sql)
            .bind(value)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{test_pool, unique_email};

    fn insert(email: &str, first_name: &str) -> InsertUser {
        InsertUser {
            email: email.to_string(),
            hash_password: "hash".to_string(),
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
        }
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("jo"), "%jo%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn email_filter_binds_the_raw_address() {
        let (clause, value) = filter_clause(&UserFilter::Email("Jo@Example.com".to_string()));
        assert!(clause.contains("lower(email)"));
        assert_eq!(value, "Jo@Example.com");
    }

    #[actix_web::test]
    async fn case_variant_email_violates_unique_index() {
        let Some(pool) = test_pool().await else { return };
        let repo = UserRepositoryPg::new(pool);
        let email = unique_email("jo");

        repo.create(&insert(&email, "Jo")).await.unwrap();
        let err = repo.create(&insert(&email.to_uppercase(), "Jo")).await.unwrap_err();

        match &err {
            error::SystemError::Conflict(Some(meta)) => {
                assert_eq!(meta.constraint.as_deref(), Some("users_email_key"));
            }
            other => panic!("expected a conflict, got {other:?}"),
        }
        assert_eq!(error::Error::from(err).to_string(), "Bad Request: Email already registered");

        let found = repo.find_by_email(&email.to_uppercase()).await.unwrap().unwrap();
        assert_eq!(found.email, email);
    }

    #[actix_web::test]
    async fn name_search_treats_wildcards_literally() {
        let Some(pool) = test_pool().await else { return };
        let repo = UserRepositoryPg::new(pool);
        let tag = Uuid::now_v7().simple().to_string();

        let mut ids = Vec::new();
        for suffix in ["50%off", "50xoff", "5_", "5a"] {
            let first_name = format!("{tag}{suffix}");
            ids.push(repo.create(&insert(&unique_email("w"), &first_name)).await.unwrap());
        }

        let percent = UserFilter::Name(format!("{tag}50%"));
        assert_eq!(repo.count_users(&percent).await.unwrap(), 1);
        let found = repo.search_users(&percent, 10, 0).await.unwrap();
        assert_eq!(found.iter().map(|u| u.id).collect::<Vec<_>>(), vec![ids[0]]);

        let underscore = UserFilter::Name(format!("{tag}5_"));
        let found = repo.search_users(&underscore, 10, 0).await.unwrap();
        assert_eq!(found.iter().map(|u| u.id).collect::<Vec<_>>(), vec![ids[2]]);

        // Case-insensitive, ordered by creation, paged by LIMIT/OFFSET.
        let all = UserFilter::Name(tag.to_uppercase());
        assert_eq!(repo.count_users(&all).await.unwrap(), 4);
        let found = repo.search_users(&all, 10, 0).await.unwrap();
        assert_eq!(found.iter().map(|u| u.id).collect::<Vec<_>>(), ids);
        let second_page = repo.search_users(&all, 3, 3).await.unwrap();
        assert_eq!(second_page.iter().map(|u| u.id).collect::<Vec<_>>(), vec![ids[3]]);
    }

    #[actix_web::test]
    async fn email_search_is_exact() {
        let Some(pool) = test_pool().await else { return };
        let repo = UserRepositoryPg::new(pool);
        let email = unique_email("amy");
        let id = repo.create(&insert(&email, "Amy")).await.unwrap();

        let exact = UserFilter::Email(email.to_uppercase());
        let found = repo.search_users(&exact, 10, 0).await.unwrap();
        assert_eq!(found.iter().map(|u| u.id).collect::<Vec<_>>(), vec![id]);

        let partial = UserFilter::Email(email[..email.len() - 4].to_string());
        assert_eq!(repo.count_users(&partial).await.unwrap(), 0);
    }
}
