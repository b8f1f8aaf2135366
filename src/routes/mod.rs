/// Route Declaration Index
///
/// Organizes the portal's static route tree into access-segregated modules,
/// so that access control is visible at the module level instead of being
/// scattered across individual descriptors. Each module contributes one
/// subtree to `create_route_table`.
///
/// The three modules map directly to the defined access tiers.

/// The public entry route (login). No session required.
pub mod public;

/// The admin layout root and every screen under it.
/// Requires a session with the 'admin' role.
pub mod admin;

/// The student layout root and every screen under it.
/// Requires a session with the 'student' role.
pub mod student;
