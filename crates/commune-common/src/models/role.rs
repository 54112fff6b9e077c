//! Role model — a named, colored permission bundle bound to a power level.
//!
//! A role is not assigned to members through a membership table: it is a
//! reusable template bound to a power level, and any member at that level
//! "holds" it. The authoritative trust value stays in the power-levels state
//! object; roles live in account data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::permissions::PermissionVector;
use crate::validation::validate_role_name;

/// A role within a space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,

    /// Role name
    pub name: String,

    /// Role color (hex as integer, e.g., 0xFF5733)
    pub color: Option<i32>,

    /// Power level this role is bound to. Members at exactly this level hold
    /// the role.
    pub power_level: i64,

    /// Position in the role list (higher = shown first, wins display ties)
    pub position: i32,

    /// Named permission vector
    pub permissions: PermissionVector,

    /// Whether this is the default role every member starts with
    pub is_default: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order roles for display: position descending, then power level.
pub fn sort_for_display(roles: &mut [Role]) {
    roles.sort_by(|a, b| {
        b.position
            .cmp(&a.position)
            .then(b.power_level.cmp(&a.power_level))
    });
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(
        length(min = 1, max = 100, message = "Role name must be 1-100 characters"),
        custom(function = validate_role_name)
    )]
    pub name: String,

    pub color: Option<i32>,

    #[validate(range(min = 0, max = 100, message = "Power level must be 0-100"))]
    pub power_level: i64,

    pub position: Option<i32>,
    pub permissions: Option<PermissionVector>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, max = 100), custom(function = validate_role_name))]
    pub name: Option<String>,

    pub color: Option<i32>,

    #[validate(range(min = 0, max = 100))]
    pub power_level: Option<i64>,

    pub position: Option<i32>,
    pub permissions: Option<PermissionVector>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_request;

    fn role(name: &str, power_level: i64, position: i32) -> Role {
        Role {
            id: Uuid::new_v4(),
            name: name.into(),
            color: None,
            power_level,
            position,
            permissions: PermissionVector::default_member(),
            is_default: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn display_order_is_position_descending() {
        let mut roles = vec![role("helper", 25, 1), role("mod", 50, 3), role("vip", 25, 2)];
        sort_for_display(&mut roles);
        let names: Vec<_> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["mod", "vip", "helper"]);
    }

    #[test]
    fn requests_reject_unsafe_role_names() {
        let req = CreateRoleRequest {
            name: "mods@here<script>".into(),
            color: None,
            power_level: 50,
            position: None,
            permissions: None,
        };
        let err = validate_request(&req).unwrap_err();
        assert!(err.to_string().contains("letters, numbers"));

        let req = UpdateRoleRequest {
            name: Some("mods@here<script>".into()),
            color: None,
            power_level: None,
            position: None,
            permissions: None,
        };
        assert!(validate_request(&req).is_err());

        let req = CreateRoleRequest {
            name: "Event Host".into(),
            color: None,
            power_level: 25,
            position: None,
            permissions: None,
        };
        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn create_request_rejects_out_of_range_levels() {
        let req = CreateRoleRequest {
            name: "mods".into(),
            color: None,
            power_level: 140,
            position: None,
            permissions: None,
        };
        assert!(validate_request(&req).is_err());
    }
}
