//! UseCase layer: one use case per socket operation plus the HTTP queries.

mod disconnect_user;
mod error;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod relay_board_event;
mod send_chat_message;
mod update_analysis;
mod update_formation;

pub use disconnect_user::DisconnectUserUseCase;
pub use error::{GetRoomDetailError, RelayBoardEventError, SendChatError, UpdateBoardError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use relay_board_event::RelayBoardEventUseCase;
pub use send_chat_message::SendChatMessageUseCase;
pub use update_analysis::UpdateAnalysisUseCase;
pub use update_formation::UpdateFormationUseCase;
