use std::sync::Arc;

use axum::{
    async_trait,
    extract::{Extension, FromRequest, RequestParts},
    http::header::AUTHORIZATION,
};
use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{Config, OwnerConfig},
    error::{unexpected_error, Error},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub roles: Vec<String>,
}

impl User {
    pub fn owner(id: Uuid) -> Self {
        Self {
            id,
            roles: vec!["owner".into()],
        }
    }

    pub fn visitor() -> Self {
        Self {
            id: Uuid::nil(),
            roles: vec![],
        }
    }

    /// The owner presents `Authorization: Bearer <owner token>`; any other
    /// caller is a visitor.
    pub fn from_bearer(owner: &OwnerConfig, authorization: Option<&str>) -> Self {
        match authorization.and_then(|value| value.strip_prefix("Bearer ")) {
            Some(token) if token.trim() == owner.token => Self::owner(owner.id),
            _ => Self::visitor(),
        }
    }

    fn has_role(&self, role: String) -> bool {
        self.roles.iter().any(|x| x == &role)
    }
}

#[async_trait]
impl<B> FromRequest<B> for User
where
    B: Send,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Extension(config) = Extension::<Arc<Config>>::from_request(req)
            .await
            .map_err(|_| unexpected_error())?;

        let authorization = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        Ok(User::from_bearer(&config.owner, authorization))
    }
}

impl PolarClass for User {
    fn get_polar_class_builder() -> oso::ClassBuilder<User> {
        oso::Class::builder()
            .name("User")
            .add_attribute_getter("id", |recv: &User| recv.id.clone())
            .add_attribute_getter("roles", |recv: &User| recv.roles.clone())
            .add_method("has_role", User::has_role)
    }

    fn get_polar_class() -> oso::Class {
        let builder = User::get_polar_class_builder();
        builder.build()
    }
}

#[test]
fn from_bearer_test() {
    let owner = OwnerConfig {
        id: Uuid::new_v4(),
        token: "owner-secret".into(),
    };

    let user = User::from_bearer(&owner, Some("Bearer owner-secret"));
    assert_eq!(user.id, owner.id);
    assert!(user.has_role("owner".into()));

    let user = User::from_bearer(&owner, Some("Bearer guess"));
    assert!(!user.has_role("owner".into()));
    assert_eq!(user.id, Uuid::nil());

    let user = User::from_bearer(&owner, Some("owner-secret"));
    assert!(user.roles.is_empty());

    let user = User::from_bearer(&owner, None);
    assert!(user.roles.is_empty());
}
