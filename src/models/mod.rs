pub mod current_user;
pub mod engagement;
pub mod featured_member;
pub mod members;
pub mod nearby_member;
pub mod testimonies;

pub use current_user::CurrentUserRow;
pub use engagement::{ActivityCountsRow, QualifyingAuthorRow};
pub use featured_member::{FeaturedMemberRow, SpotlightRow};
pub use members::{DigestRecipientRow, MemberCoordsRow, MemberRow};
pub use nearby_member::NearbyMemberRow;
pub use testimonies::TestimonyRow;
