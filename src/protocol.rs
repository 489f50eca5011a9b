// author: kodeholic (powered by Claude)

pub mod message;
pub mod opcode;
pub mod request;
pub mod response;

pub use message::{
    AnnounceType, Codec, CodeString, ConnectorId, ModemMode, Request, VoiceId, WireVersion,
};
pub use request::decode_request;
pub use response::{ResponsePacket, ResponseView};
