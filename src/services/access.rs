//! Request-scoped access decisions. Identity comes from the university's
//! auth service as JWT claims; nothing here touches the database.

use std::collections::HashSet;

use time::PrimitiveDateTime;

use crate::db::models::Quiz;
use crate::services::{schedule, QuizError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub(crate) fn parse(raw: &str) -> Option<Role> {
        match raw {
            "admin" => Some(Role::Admin),
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

/// The caller, decoded from token claims once per request.
#[derive(Debug, Clone)]
pub(crate) struct Identity {
    pub(crate) user_id: i64,
    pub(crate) role: Role,
    pub(crate) group_id: Option<i64>,
    pub(crate) permissions: HashSet<String>,
}

impl Identity {
    pub(crate) fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub(crate) fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

/// What the caller is relative to one resource. Resolved once, then passed
/// into the operation instead of re-deriving role checks along the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Capability {
    Admin,
    Owner,
    GroupMember,
    Other,
}

impl Capability {
    pub(crate) fn can_manage(self) -> bool {
        matches!(self, Capability::Admin | Capability::Owner)
    }
}

pub(crate) fn resolve_capability(
    identity: &Identity,
    owner_id: i64,
    target_group: Option<i64>,
) -> Capability {
    if identity.is_admin() {
        return Capability::Admin;
    }
    if identity.user_id == owner_id {
        return Capability::Owner;
    }
    if let (Some(own_group), Some(group)) = (identity.group_id, target_group) {
        if own_group == group {
            return Capability::GroupMember;
        }
    }
    Capability::Other
}

/// The group a caller acts for during an attempt. Students always use the
/// group from their claims; admins must name one explicitly, and nobody
/// else may claim a group at all.
pub(crate) fn effective_group(
    identity: &Identity,
    claimed: Option<i64>,
) -> Result<i64, QuizError> {
    match (identity.is_admin(), claimed) {
        (true, Some(group)) => Ok(group),
        (true, None) => Err(QuizError::AccessDenied),
        (false, Some(_)) => Err(QuizError::AccessDenied),
        (false, None) => identity.group_id.ok_or(QuizError::AccessDenied),
    }
}

/// Full attempt gate, in order: group membership, PIN (when required),
/// activation and schedule window. The first failed check names the reason.
pub(crate) fn authorize_attempt(
    quiz: &Quiz,
    identity: &Identity,
    claimed_group: Option<i64>,
    pin: Option<&str>,
    now: PrimitiveDateTime,
) -> Result<(), QuizError> {
    let group = effective_group(identity, claimed_group)?;
    if group != quiz.group_id {
        return Err(QuizError::AccessDenied);
    }
    if let Some(pin) = pin {
        if pin != quiz.pin {
            return Err(QuizError::WrongPin);
        }
    }
    schedule::ensure_open(quiz, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn identity(role: Role, group_id: Option<i64>) -> Identity {
        Identity { user_id: 10, role, group_id, permissions: HashSet::new() }
    }

    fn quiz() -> Quiz {
        Quiz {
            id: 1,
            name: "Algebra midterm".to_string(),
            teacher_id: 77,
            group_id: 5,
            subject_id: 3,
            question_count: 5,
            duration_minutes: 30,
            start_time: datetime!(2025-01-01 10:00:00),
            pin: "4242".to_string(),
            is_activated: true,
            created_at: datetime!(2025-01-01 09:00:00),
            updated_at: datetime!(2025-01-01 09:00:00),
        }
    }

    #[test]
    fn capability_matrix() {
        let admin = identity(Role::Admin, None);
        assert_eq!(resolve_capability(&admin, 99, Some(5)), Capability::Admin);

        let owner = Identity { user_id: 77, ..identity(Role::Teacher, None) };
        assert_eq!(resolve_capability(&owner, 77, None), Capability::Owner);

        let member = identity(Role::Student, Some(5));
        assert_eq!(resolve_capability(&member, 77, Some(5)), Capability::GroupMember);

        let outsider = identity(Role::Student, Some(6));
        assert_eq!(resolve_capability(&outsider, 77, Some(5)), Capability::Other);

        let groupless = identity(Role::Teacher, None);
        assert_eq!(resolve_capability(&groupless, 77, Some(5)), Capability::Other);
    }

    #[test]
    fn can_manage_only_admin_and_owner() {
        assert!(Capability::Admin.can_manage());
        assert!(Capability::Owner.can_manage());
        assert!(!Capability::GroupMember.can_manage());
        assert!(!Capability::Other.can_manage());
    }

    #[test]
    fn students_use_claim_group_and_cannot_override() {
        let student = identity(Role::Student, Some(5));
        assert_eq!(effective_group(&student, None), Ok(5));
        assert_eq!(effective_group(&student, Some(6)), Err(QuizError::AccessDenied));

        let groupless = identity(Role::Student, None);
        assert_eq!(effective_group(&groupless, None), Err(QuizError::AccessDenied));
    }

    #[test]
    fn admins_must_name_a_group() {
        let admin = identity(Role::Admin, None);
        assert_eq!(effective_group(&admin, Some(5)), Ok(5));
        assert_eq!(effective_group(&admin, None), Err(QuizError::AccessDenied));
    }

    #[test]
    fn attempt_gate_checks_group_before_pin() {
        let outsider = identity(Role::Student, Some(6));
        let err = authorize_attempt(
            &quiz(),
            &outsider,
            None,
            Some("wrong"),
            datetime!(2025-01-01 10:10:00),
        )
        .unwrap_err();
        assert_eq!(err, QuizError::AccessDenied);
    }

    #[test]
    fn attempt_gate_rejects_wrong_pin_inside_window() {
        let student = identity(Role::Student, Some(5));
        let err = authorize_attempt(
            &quiz(),
            &student,
            None,
            Some("0000"),
            datetime!(2025-01-01 10:10:00),
        )
        .unwrap_err();
        assert_eq!(err, QuizError::WrongPin);
    }

    #[test]
    fn attempt_gate_skips_pin_when_not_required() {
        let student = identity(Role::Student, Some(5));
        assert_eq!(
            authorize_attempt(&quiz(), &student, None, None, datetime!(2025-01-01 10:10:00)),
            Ok(())
        );
    }

    #[test]
    fn attempt_gate_reports_schedule_after_pin() {
        let student = identity(Role::Student, Some(5));
        let err = authorize_attempt(
            &quiz(),
            &student,
            None,
            Some("4242"),
            datetime!(2025-01-01 09:59:59),
        )
        .unwrap_err();
        assert_eq!(err, QuizError::NotStarted);
    }

    #[test]
    fn admin_attempts_through_named_group() {
        let admin = identity(Role::Admin, None);
        assert_eq!(
            authorize_attempt(&quiz(), &admin, Some(5), Some("4242"), datetime!(2025-01-01 10:10:00)),
            Ok(())
        );
        assert_eq!(
            authorize_attempt(&quiz(), &admin, Some(9), Some("4242"), datetime!(2025-01-01 10:10:00)),
            Err(QuizError::AccessDenied)
        );
    }
}
