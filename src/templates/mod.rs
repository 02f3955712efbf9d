// Shared page pieces
pub mod base_template;
pub use base_template::NavItem;

// Individual template files
pub mod login_template;
pub mod users_page_template;
pub mod charts_template;
pub mod resources_template;
pub mod upload_template;
pub mod clear_folder_template;
pub mod confirmation_template;

pub use login_template::LoginTemplate;
pub use users_page_template::{RoleOption, UsersPageTemplate};
pub use charts_template::ChartsTemplate;
pub use resources_template::ResourcesTemplate;
pub use upload_template::UploadTemplate;
pub use clear_folder_template::ClearFolderTemplate;
pub use confirmation_template::ConfirmationTemplate;
