/// Router Module Index
///
/// Organizes the application's routing logic into role-segregated modules.
/// Each protected module declares its allowed-role set as a constant; the
/// route guard is layered onto the group in `create_router`, so access
/// control is applied explicitly at the module level and a route can never
/// be exposed without an allowed-role declaration.

/// Routes accessible to everyone (anonymous included): catalog browsing,
/// session establishment/teardown, the login entry point, and the
/// unauthorized notice.
pub mod public;

/// Routes available to any authenticated session regardless of role.
pub mod account;

/// Booking routes, restricted to the 'tourist' role.
pub mod tourist;

/// Itinerary routes, restricted to the 'guide' role.
pub mod guide;

/// Moderation and oversight routes, restricted to the 'admin' role.
pub mod admin;
