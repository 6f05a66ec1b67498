use oso::{Oso, PolarClass};

use crate::auth::{Journal, User};
use crate::error::Error;

pub fn new() -> Result<Oso, Error> {
    let mut o = Oso::new();

    o.register_class(Journal::get_polar_class())?;
    o.register_class(User::get_polar_class())?;

    o.load_str(include_str!("rules.polar"))?;

    Ok(o)
}

#[test]
fn visitor_role_test() {
    let authorizor = new().unwrap();
    let visitor = User::visitor();

    let result = authorizor.query_rule("has_role", (visitor.clone(), "visitor", Journal::default()));
    assert!(result.unwrap().next().unwrap().is_ok());

    let result = authorizor.query_rule("has_role", (visitor.clone(), "owner", Journal::default()));
    assert!(result.unwrap().next().is_none());

    let result = authorizor.is_allowed(visitor.clone(), "read", Journal::default());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(visitor.clone(), "sign_guestbook", Journal::default());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(visitor.clone(), "write", Journal::default());
    assert_eq!(result.unwrap(), false);
}

#[test]
fn owner_role_test() {
    use uuid::Uuid;

    let authorizor = new().unwrap();
    let owner = User::owner(Uuid::new_v4());

    let result = authorizor.query_rule("has_role", (owner.clone(), "owner", Journal::default()));
    assert!(result.unwrap().next().unwrap().is_ok());

    let result = authorizor.is_allowed(owner.clone(), "read", Journal::default());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(owner.clone(), "sign_guestbook", Journal::default());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(owner.clone(), "write", Journal::default());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(owner.clone(), "delete_everything", Journal::default());
    assert_eq!(result.unwrap(), false);
}
