//! Caller identity and contact attribution.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Attribution used when no authenticated identity is available.
pub const PUBLIC_ATTRIBUTION: &str = "public";

/// Access role carried by an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access including contact listing and Google setup.
    Admin,
    /// Registers contacts.
    Editor,
    /// Registers contacts; the role given to self-registered users.
    Viewer,
    /// Anonymous caller admitted by the public-contacts switch.
    Public,
}

impl Role {
    /// Roles allowed to check and add contacts.
    pub const CONTACT_ROLES: [Self; 3] = [Self::Viewer, Self::Editor, Self::Admin];

    /// Whether the role may register and look up contacts.
    #[must_use]
    pub fn can_register_contacts(self) -> bool {
        Self::CONTACT_ROLES.contains(&self)
    }
}

/// An identified caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Actor {
    /// Login name.
    #[schema(example = "ana")]
    pub username: String,
    /// Human-readable name used as consultant attribution.
    #[serde(rename = "name")]
    #[schema(example = "Ana Silva")]
    pub display_name: String,
    /// Access role.
    pub role: Role,
}

impl Actor {
    /// The anonymous actor used when public contact access is enabled.
    #[must_use]
    pub fn public() -> Self {
        Self {
            username: PUBLIC_ATTRIBUTION.to_owned(),
            display_name: PUBLIC_ATTRIBUTION.to_owned(),
            role: Role::Public,
        }
    }
}

/// Consultant and username stamped on a new contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    /// Who registered the contact.
    pub consultant: String,
    /// Login of the registering actor.
    pub username: String,
}

impl Attribution {
    /// Resolve attribution for a caller.
    ///
    /// Anonymous and public callers are credited with the submitted
    /// consultant hint, or `public` when the hint is blank. Authenticated
    /// callers are credited under their display name.
    ///
    /// # Examples
    /// ```
    /// use contact_registry::domain::{Attribution, Actor, Role};
    ///
    /// let ana = Actor { username: "ana".into(), display_name: "Ana Silva".into(), role: Role::Editor };
    /// let attribution = Attribution::resolve(Some(&ana), Some("ignored"));
    /// assert_eq!(attribution.consultant, "Ana Silva");
    /// assert_eq!(attribution.username, "ana");
    ///
    /// let anonymous = Attribution::resolve(None, None);
    /// assert_eq!(anonymous.consultant, "public");
    /// ```
    #[must_use]
    pub fn resolve(actor: Option<&Actor>, consultant_hint: Option<&str>) -> Self {
        let hint = consultant_hint
            .map(str::trim)
            .filter(|hint| !hint.is_empty());
        let consultant = match actor {
            Some(actor) if actor.role != Role::Public => non_blank_or_public(&actor.display_name),
            _ => hint.unwrap_or(PUBLIC_ATTRIBUTION).to_owned(),
        };
        let username = actor
            .map_or(PUBLIC_ATTRIBUTION, |actor| actor.username.as_str())
            .to_owned();
        Self {
            consultant,
            username: non_blank_or_public(&username),
        }
    }
}

fn non_blank_or_public(value: &str) -> String {
    if value.trim().is_empty() {
        PUBLIC_ATTRIBUTION.to_owned()
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn actor(role: Role) -> Actor {
        Actor {
            username: "ana".to_owned(),
            display_name: "Ana Silva".to_owned(),
            role,
        }
    }

    #[rstest]
    #[case(None, Some("Carla"), "Carla", "public")]
    #[case(None, Some("  "), "public", "public")]
    #[case(None, None, "public", "public")]
    #[case(Some(Actor::public()), Some("Carla"), "Carla", "public")]
    #[case(Some(actor(Role::Viewer)), Some("Carla"), "Ana Silva", "ana")]
    #[case(Some(actor(Role::Admin)), None, "Ana Silva", "ana")]
    fn resolves_attribution(
        #[case] caller: Option<Actor>,
        #[case] hint: Option<&str>,
        #[case] consultant: &str,
        #[case] username: &str,
    ) {
        let resolved = Attribution::resolve(caller.as_ref(), hint);
        assert_eq!(resolved.consultant, consultant);
        assert_eq!(resolved.username, username);
    }

    #[rstest]
    fn authenticated_actor_without_display_name_is_public() {
        let mut caller = actor(Role::Editor);
        caller.display_name = String::new();
        let resolved = Attribution::resolve(Some(&caller), Some("Carla"));
        assert_eq!(resolved.consultant, "public");
        assert_eq!(resolved.username, "ana");
    }

    #[rstest]
    #[case(Role::Admin, true)]
    #[case(Role::Editor, true)]
    #[case(Role::Viewer, true)]
    #[case(Role::Public, false)]
    fn contact_roles(#[case] role: Role, #[case] allowed: bool) {
        assert_eq!(role.can_register_contacts(), allowed);
    }

    #[rstest]
    fn role_serialises_lowercase() {
        let value = serde_json::to_value(Role::Editor).expect("role serialises");
        assert_eq!(value, serde_json::json!("editor"));
    }
}
