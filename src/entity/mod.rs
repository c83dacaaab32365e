pub mod audit_logs;
pub mod chat_participants;
pub mod chats;
pub mod colleges;
pub mod favorites;
pub mod messages;
pub mod products;
pub mod purchase_requests;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use chat_participants::Entity as ChatParticipants;
pub use chats::Entity as Chats;
pub use colleges::Entity as Colleges;
pub use favorites::Entity as Favorites;
pub use messages::Entity as Messages;
pub use products::Entity as Products;
pub use purchase_requests::Entity as PurchaseRequests;
pub use users::Entity as Users;
