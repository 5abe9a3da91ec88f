//! Avatar image URLs

use crate::models::{AvatarInfo, PlayerInfo};

const MC_SKIN_AVATAR_BASE: &str = "https://avatars.cloudhaven.gg/avatars";
const QQ_AVATAR_BASE: &str = "https://q1.qlogo.cn/g";

/// Rendered when the player has no uuid yet
pub const FALLBACK_UUID: &str = "853c80ef3c3749fdaa49938b674adae6";

/// Image URL for a player's avatar
pub fn avatar_src(player: &PlayerInfo) -> String {
    match &player.avatar {
        AvatarInfo::McSkin => {
            let uuid = if player.uuid.is_empty() {
                FALLBACK_UUID
            } else {
                player.uuid.as_str()
            };
            format!("{}/{}", MC_SKIN_AVATAR_BASE, uuid)
        }
        AvatarInfo::Qq { qq_id } => format!("{}?b=qq&nk={}&s=140", QQ_AVATAR_BASE, qq_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(uuid: &str, avatar: AvatarInfo) -> PlayerInfo {
        PlayerInfo {
            name: "Alex".to_string(),
            uuid: uuid.to_string(),
            avatar,
        }
    }

    #[test]
    fn test_skin_avatar_uses_uuid() {
        let src = avatar_src(&player("ec561538f3fd461daff5086b22154bce", AvatarInfo::McSkin));
        assert_eq!(
            src,
            "https://avatars.cloudhaven.gg/avatars/ec561538f3fd461daff5086b22154bce"
        );
    }

    #[test]
    fn test_skin_avatar_without_uuid() {
        let src = avatar_src(&player("", AvatarInfo::McSkin));
        assert!(src.ends_with(FALLBACK_UUID));
    }

    #[test]
    fn test_qq_avatar() {
        let src = avatar_src(&player(
            "",
            AvatarInfo::Qq {
                qq_id: "123456".to_string(),
            },
        ));
        assert_eq!(src, "https://q1.qlogo.cn/g?b=qq&nk=123456&s=140");
    }
}
