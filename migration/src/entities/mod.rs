pub mod caption_generation;
pub mod sharing_event;
pub mod sharing_link;
pub mod sharing_report;
pub mod user;

pub use caption_generation::Entity as CaptionGenerationEntity;
pub use sharing_event::Entity as SharingEventEntity;
pub use sharing_link::Entity as SharingLinkEntity;
pub use sharing_report::Entity as SharingReportEntity;
pub use user::Entity as UserEntity;
