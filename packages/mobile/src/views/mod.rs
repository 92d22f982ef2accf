mod layout;
pub use layout::TabLayout;

mod auth;
pub use auth::{ForgotPassword, Login, Register};

mod conferences;
pub use conferences::Conferences;

mod conference_detail;
pub use conference_detail::ConferenceDetail;

mod tickets;
pub use tickets::Tickets;

mod transactions;
pub use transactions::Transactions;

mod papers;
pub use papers::Papers;

mod profile;
pub use profile::Profile;
