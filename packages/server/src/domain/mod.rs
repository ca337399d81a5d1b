//! Domain layer: entities, value objects and the ports the outer layers
//! implement (dependency inversion).

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod registry;
pub mod value_object;

pub use entity::{
    AuthenticatedUser, ChatMessage, ConnectedUser, Formation, MessageKind, PermissionSet,
    PlayerPosition, Role, Room, UserAction,
};
pub use error::{MessagePushError, RegistryError, RoomError, ValidationError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use registry::{DepartedRoom, JoinOutcome, RoomRegistry};
pub use value_object::{MessageContent, RoomId, SocketId, Timestamp, UserId, UserName};
