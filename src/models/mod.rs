pub mod app_state;
pub mod confirmation;
pub mod credentials;
pub mod current_user;
pub mod hardware;
pub mod resource_listing;
pub mod role;
pub mod user_card;
pub mod user_record;

pub use app_state::{AppState, Session};
pub use confirmation::ConfirmationAction;
pub use credentials::{extract_token, CredentialStore};
pub use current_user::CurrentUser;
pub use hardware::{GpuVendor, HardwareRecord, ParsedHardware, UNKNOWN_LABEL};
pub use resource_listing::{Environment, EnvironmentResources, ResourceListing, ResourceOverview};
pub use role::{RoleCode, RoleLabel};
pub use user_card::UserCard;
pub use user_record::{operators_first, users_from_value, QueueOffsets, UserRecord};
