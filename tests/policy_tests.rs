//! 授权策略测试

mod common;

use novel_system::{
    auth::middleware::AuthContext,
    auth::policy,
    models::user::Role,
};

fn ctx(login_id: &str, roles: &[Role]) -> AuthContext {
    AuthContext {
        login_id: login_id.to_string(),
        roles: roles.to_vec(),
    }
}

#[test]
fn test_require_role_rejects_empty_context() {
    assert!(policy::require_role(None, Role::Admin).is_err());
}

#[test]
fn test_require_role_accepts_when_held() {
    let ctx = ctx("alice", &[Role::User, Role::Admin]);
    assert!(policy::require_role(Some(&ctx), Role::Admin).is_ok());
}

#[test]
fn test_require_role_rejects_despite_other_roles() {
    let ctx = ctx("bob", &[Role::User, Role::Author]);
    assert!(policy::require_role(Some(&ctx), Role::Admin).is_err());
}

#[test]
fn test_require_any_role() {
    let author = ctx("carol", &[Role::Author]);
    assert!(policy::require_any_role(Some(&author), &[Role::Author, Role::Admin]).is_ok());
    assert!(policy::require_any_role(Some(&author), &[Role::Admin]).is_err());
    assert!(policy::require_any_role(None, &[Role::Author, Role::Admin]).is_err());
}

#[test]
fn test_require_owner_or_role() {
    let owner = ctx("alice", &[Role::User]);
    let admin = ctx("root", &[Role::Admin]);
    let other = ctx("bob", &[Role::User]);

    assert!(policy::require_owner_or_role(Some(&owner), "alice", Role::Admin).is_ok());
    assert!(policy::require_owner_or_role(Some(&admin), "alice", Role::Admin).is_ok());
    assert!(policy::require_owner_or_role(Some(&other), "alice", Role::Admin).is_err());
    assert!(policy::require_owner_or_role(None, "alice", Role::Admin).is_err());
}
