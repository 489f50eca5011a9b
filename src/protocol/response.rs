// author: kodeholic (powered by Claude)
// 응답 패킷 (서버 → 클라이언트)
//
// 레이아웃 (빅엔디안, 고정 크기):
//   magic(6) version(1) type(1) session_id(4) seq(1) frame_count(1) frames(3 × frame_size)
//
//   AMBE : frame_size  9 → 41 bytes, type 1 (데이터) / 0 (종료)
//   IMBE : frame_size 18 → 68 bytes, type 3 (데이터) / 0 (종료)
//
// 사용하지 않는 프레임 슬롯은 0으로 채워 항상 고정 크기로 송신

use bytes::{Buf, BufMut, BytesMut};

use crate::config;
use crate::error::{SpkError, SpkResult};
use crate::protocol::message::{Codec, WireVersion};
use crate::protocol::opcode::packet_type;

// ----------------------------------------------------------------------------
// [ResponsePacket] 스트리밍 태스크가 재사용하는 송신 골격
// ----------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ResponsePacket {
    version:     WireVersion,
    codec:       Codec,
    packet_type: u8,
    session_id:  u32,
    seq:         u8,
    frames:      Vec<u8>,
}

impl ResponsePacket {
    /// 데이터 타입, seq 0, 빈 배치로 시작
    pub fn new(version: WireVersion, codec: Codec, session_id: u32) -> Self {
        Self {
            version,
            codec,
            packet_type: codec.data_packet_type(version),
            session_id,
            seq:         0,
            frames:      Vec::with_capacity(config::FRAMES_PER_PACKET * codec.frame_size()),
        }
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn seq(&self) -> u8 {
        self.seq
    }

    pub fn frame_count(&self) -> u8 {
        (self.frames.len() / self.codec.frame_size()) as u8
    }

    pub fn is_full(&self) -> bool {
        self.frame_count() as usize >= config::FRAMES_PER_PACKET
    }

    pub fn is_terminator(&self) -> bool {
        self.packet_type == packet_type::RESPONSE_TERMINATOR
    }

    /// 프레임 하나 추가. 배치가 가득 찼거나 크기가 다르면 무시하고 false
    pub fn push_frame(&mut self, frame: &[u8]) -> bool {
        if self.is_full() || frame.len() != self.codec.frame_size() {
            return false;
        }
        self.frames.extend_from_slice(frame);
        true
    }

    pub fn clear_frames(&mut self) {
        self.frames.clear();
    }

    /// 데이터 패킷 송신 후 호출. 8비트에서 자연스럽게 wrap
    pub fn advance_seq(&mut self) {
        self.seq = self.seq.wrapping_add(1);
    }

    pub fn mark_terminator(&mut self) {
        self.packet_type = packet_type::RESPONSE_TERMINATOR;
    }

    pub fn encode(&self) -> BytesMut {
        let size = self.codec.response_size();
        let mut buf = BytesMut::with_capacity(size);
        buf.put_slice(config::PACKET_MAGIC);
        buf.put_u8(self.version.as_byte());
        buf.put_u8(self.packet_type);
        buf.put_u32(self.session_id);
        buf.put_u8(self.seq);
        buf.put_u8(self.frame_count());
        buf.put_slice(&self.frames);
        buf.put_bytes(0, size - buf.len());
        buf
    }
}

// ----------------------------------------------------------------------------
// [ResponseView] 수신 측(클라이언트/테스트)용 파서
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseView {
    pub version:     u8,
    pub packet_type: u8,
    pub session_id:  u32,
    pub seq:         u8,
    pub frame_count: u8,
    /// frame_count 개의 프레임만 (패딩 제외)
    pub frames:      Vec<u8>,
}

impl ResponseView {
    /// 패킷 크기로 코덱을 판별해 파싱
    pub fn parse(datagram: &[u8]) -> SpkResult<Self> {
        let codec = if datagram.len() == Codec::Ambe.response_size() {
            Codec::Ambe
        } else if datagram.len() == Codec::Imbe.response_size() {
            Codec::Imbe
        } else {
            return Err(SpkError::BadSize { expected: Codec::Ambe.response_size(), actual: datagram.len() });
        };
        if datagram[..config::PACKET_MAGIC.len()] != config::PACKET_MAGIC[..] {
            return Err(SpkError::BadMagic);
        }

        let mut buf = &datagram[config::PACKET_MAGIC.len()..];
        let version     = buf.get_u8();
        let packet_type = buf.get_u8();
        let session_id  = buf.get_u32();
        let seq         = buf.get_u8();
        let frame_count = buf.get_u8();
        if frame_count as usize > config::FRAMES_PER_PACKET {
            return Err(SpkError::Decode(format!("frame count {} out of range", frame_count)));
        }
        let frames = buf[..frame_count as usize * codec.frame_size()].to_vec();

        Ok(Self { version, packet_type, session_id, seq, frame_count, frames })
    }

    pub fn is_terminator(&self) -> bool {
        self.packet_type == packet_type::RESPONSE_TERMINATOR
    }
}

// ----------------------------------------------------------------------------
// [테스트]
// ----------------------------------------------------------------------------
