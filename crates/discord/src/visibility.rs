//! Channel visibility math over permission bit-sets.

use serenity::all::{PermissionOverwrite, PermissionOverwriteType, Permissions, RoleId};

/// Whether a role can view a channel, given the role's base permissions and
/// the channel's overwrites. Denies are applied before allows, as Discord
/// resolves them.
pub fn role_can_view(
    base: Permissions,
    overwrites: &[PermissionOverwrite],
    role: RoleId,
) -> bool {
    let mut permissions = base;
    for overwrite in overwrites {
        if let PermissionOverwriteType::Role(overwritten) = &overwrite.kind
            && *overwritten == role
        {
            permissions = (permissions & !overwrite.deny) | overwrite.allow;
        }
    }
    permissions.contains(Permissions::VIEW_CHANNEL)
}
