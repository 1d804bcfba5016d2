/**
 * Room Access Control
 *
 * Admins may read and write every room. Users may only touch rooms they own.
 * A missing room is not an access decision; callers report it as `NotFound`
 * before asking.
 */

use crate::shared::chat::{ChatRoom, Identity, Role};

/// Whether `identity` may read or write `room`
pub fn can_access_room(identity: &Identity, room: &ChatRoom) -> bool {
    match identity.role {
        Role::Admin => true,
        Role::User => room.user_id == identity.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::chat::RoomType;
    use chrono::Utc;
    use uuid::Uuid;

    fn identity(role: Role) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            username: format!("{}-{}", role, Uuid::new_v4().simple()),
            full_name: String::new(),
            role,
        }
    }

    fn room_owned_by(user_id: Uuid) -> ChatRoom {
        ChatRoom {
            id: 1,
            user_id,
            admin_id: None,
            field_id: None,
            room_type: RoomType::General,
            is_active: true,
            created_at: Utc::now(),
            last_message_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_has_access() {
        let owner = identity(Role::User);
        assert!(can_access_room(&owner, &room_owned_by(owner.id)));
    }

    #[test]
    fn test_other_user_denied() {
        let owner = identity(Role::User);
        let stranger = identity(Role::User);
        assert!(!can_access_room(&stranger, &room_owned_by(owner.id)));
    }

    #[test]
    fn test_any_admin_has_access() {
        let owner = identity(Role::User);
        let admin = identity(Role::Admin);
        let mut room = room_owned_by(owner.id);
        assert!(can_access_room(&admin, &room));

        room.admin_id = Some(Uuid::new_v4());
        assert!(can_access_room(&admin, &room));
    }
}
