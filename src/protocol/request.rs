// author: kodeholic (powered by Claude)
// 요청 패킷 디코더
//
// 검증 순서 (실패 시 즉시 드롭, 응답 없음):
//   1. 7바이트 이상 + magic 일치       → 불일치는 조용히 무시 (BadMagic)
//   2. offset 6 버전 바이트 → V0 / V1   → 그 외 UnsupportedVersion
//   3. offset 7 패킷 타입 == REQUEST   → 그 외 UnexpectedPacketType
//   4. 버전별 고정 크기와 정확히 일치
//   5. 빅엔디안 필드 디코드
//   6. 버전별 유효 모뎀 모드 확인
//   7. code_str 마지막 바이트 NUL 강제 (CodeString::from_field)

use bytes::Buf;

use crate::config;
use crate::error::{SpkError, SpkResult};
use crate::protocol::message::{
    AnnounceType, CodeString, ConnectorId, ModemMode, Request, VoiceId, WireVersion,
};
use crate::protocol::opcode::packet_type;

const VERSION_OFFSET: usize = 6;
const TYPE_OFFSET:    usize = 7;

/// magic + 버전까지 확인. 통과하면 버전을 돌려줌
pub fn peek_version(datagram: &[u8]) -> SpkResult<WireVersion> {
    if datagram.len() < VERSION_OFFSET + 1 || datagram[..VERSION_OFFSET] != config::PACKET_MAGIC[..] {
        return Err(SpkError::BadMagic);
    }
    WireVersion::from_byte(datagram[VERSION_OFFSET])
}

/// 수신 데이터그램 하나를 요청으로 디코드
pub fn decode_request(datagram: &[u8]) -> SpkResult<Request> {
    let version = peek_version(datagram)?;

    let expected = version.request_size();
    let kind = match datagram.get(TYPE_OFFSET) {
        Some(t) => *t,
        None    => return Err(SpkError::BadSize { expected, actual: datagram.len() }),
    };
    if kind != packet_type::REQUEST {
        return Err(SpkError::UnexpectedPacketType(kind));
    }

    if datagram.len() != expected {
        return Err(SpkError::BadSize { expected, actual: datagram.len() });
    }

    decode_fields(version, datagram)
}

fn decode_fields(version: WireVersion, datagram: &[u8]) -> SpkResult<Request> {
    let mut buf = &datagram[TYPE_OFFSET + 1..];
    let needed = version.request_size() - (TYPE_OFFSET + 1);
    if buf.remaining() < needed {
        return Err(SpkError::Decode(format!("need {} payload bytes, got {}", needed, buf.remaining())));
    }

    let session_id    = buf.get_u32();
    let connector     = ConnectorId::from_byte(buf.get_u8());
    let announce_type = AnnounceType::from_byte(buf.get_u8());
    let announce_data = [buf.get_u32(), buf.get_u32()];
    let raw_mode      = buf.get_u8();
    let voice = if version.has_voice_id() {
        VoiceId::from_byte(buf.get_u8())
    } else {
        VoiceId::default()
    };

    let mut field = [0u8; config::CODE_STR_LEN];
    buf.copy_to_slice(&mut field);

    let modem_mode = ModemMode::from_wire(version, raw_mode)?;

    Ok(Request {
        version,
        session_id,
        connector,
        announce_type,
        announce_data,
        modem_mode,
        voice,
        code: CodeString::from_field(&field),
    })
}

// ----------------------------------------------------------------------------
// [테스트]
// ----------------------------------------------------------------------------
