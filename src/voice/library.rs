// author: kodeholic (powered by Claude)
// 음성 클립 저장소
//
// 디렉터리 구조:
//   <root>/<bank>/<codec-dir>/<XX>*.ambe
//     bank      : srf-male-en | srf-female-en
//     codec-dir : dmr (DMR/C4FM/C4FM-half/NXDN) | dstar | p25
//     XX        : 파일명 앞 두 글자 = 코드 쌍
//
// 시작 시 1회 전부 메모리에 올려 두고 스트리밍 중에는 디스크를 건드리지 않음.
// 클립은 헤더 없이 고정 크기 코덱 프레임을 이어 붙인 바이트열.

use std::collections::HashMap;
use std::path::Path;

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::error::{SpkError, SpkResult};
use crate::protocol::message::{ModemMode, VoiceId};

const CLIP_EXTENSIONS: &[&str] = &["ambe", "imbe"];
const BANKS:           &[&str] = &["srf-male-en", "srf-female-en"];
const CODEC_DIRS:      &[&str] = &["dmr", "dstar", "p25"];

/// 저장소 안의 클립 위치 (`<bank>/<codec-dir>/<file>`)
pub type ClipPath = String;

// ----------------------------------------------------------------------------
// [VoiceAssets] 스트리밍 엔진이 의존하는 seam
// ----------------------------------------------------------------------------

pub trait VoiceAssets: Send + Sync {
    /// (모뎀 모드, 음성, 코드 쌍) → 클립 위치. 없으면 None
    fn resolve(&self, mode: ModemMode, voice: VoiceId, pair: [u8; 2]) -> Option<ClipPath>;

    fn read_clip(&self, path: &str) -> SpkResult<Bytes>;
}

pub fn bank_dir(voice: VoiceId) -> &'static str {
    match voice {
        VoiceId::MaleEn   => "srf-male-en",
        VoiceId::FemaleEn => "srf-female-en",
    }
}

pub fn codec_dir(mode: ModemMode) -> &'static str {
    match mode {
        ModemMode::Dmr | ModemMode::C4fm | ModemMode::C4fmHalfDeviation | ModemMode::Nxdn => "dmr",
        ModemMode::Dstar => "dstar",
        ModemMode::P25   => "p25",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ClipKey {
    bank:  &'static str,
    codec: &'static str,
    pair:  [u8; 2],
}

// ----------------------------------------------------------------------------
// [VoiceLibrary]
// ----------------------------------------------------------------------------

#[derive(Default)]
pub struct VoiceLibrary {
    index: HashMap<ClipKey, ClipPath>,
    clips: HashMap<ClipPath, Bytes>,
}

impl VoiceLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 루트 디렉터리 전체 적재. 루트가 없으면 빈 저장소 (모든 코드 쌍 miss)
    pub async fn load(root: &Path) -> SpkResult<Self> {
        let mut library = Self::new();

        if tokio::fs::metadata(root).await.is_err() {
            warn!("[voice] asset root {} not found, every code pair will be skipped", root.display());
            return Ok(library);
        }

        for bank in BANKS {
            for codec in CODEC_DIRS {
                let dir = root.join(bank).join(codec);
                let mut entries = match tokio::fs::read_dir(&dir).await {
                    Ok(e)  => e,
                    Err(_) => { debug!("[voice] no directory {}", dir.display()); continue; }
                };

                // 같은 코드 쌍이 여러 개면 이름순 첫 파일: 적재 순서를 결정적으로
                let mut names = Vec::new();
                while let Some(entry) = entries.next_entry().await? {
                    if let Some(name) = entry.file_name().to_str() {
                        names.push(name.to_string());
                    }
                }
                names.sort();

                for name in names {
                    if !is_clip_file(&name) {
                        continue;
                    }
                    let data = tokio::fs::read(dir.join(&name)).await?;
                    library.insert(bank, codec, &name, Bytes::from(data));
                }
            }
        }

        info!("[voice] loaded {} clip(s) from {}", library.len(), root.display());
        Ok(library)
    }

    /// 클립 1개 등록. 코드 쌍이 이미 있으면 기존 것 유지하고 false
    pub fn insert(&mut self, bank: &str, codec: &str, file_name: &str, data: Bytes) -> bool {
        let (Some(bank), Some(codec)) = (
            BANKS.iter().find(|b| **b == bank).copied(),
            CODEC_DIRS.iter().find(|c| **c == codec).copied(),
        ) else {
            warn!("[voice] unknown bank/codec {}/{}, skipping {}", bank, codec, file_name);
            return false;
        };
        let pair = match file_name.as_bytes() {
            [a, b, ..] => [*a, *b],
            _          => return false,
        };

        let key = ClipKey { bank, codec, pair };
        if self.index.contains_key(&key) {
            debug!("[voice] duplicate code pair {}/{}/{}, keeping first", bank, codec, file_name);
            return false;
        }

        let path = format!("{}/{}/{}", bank, codec, file_name);
        self.index.insert(key, path.clone());
        self.clips.insert(path, data);
        true
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

impl VoiceAssets for VoiceLibrary {
    fn resolve(&self, mode: ModemMode, voice: VoiceId, pair: [u8; 2]) -> Option<ClipPath> {
        let key = ClipKey { bank: bank_dir(voice), codec: codec_dir(mode), pair };
        self.index.get(&key).cloned()
    }

    fn read_clip(&self, path: &str) -> SpkResult<Bytes> {
        self.clips
            .get(path)
            .cloned()
            .ok_or_else(|| SpkError::ClipNotFound(path.to_string()))
    }
}

fn is_clip_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |ext| CLIP_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_share_dmr_bank() {
        assert_eq!(codec_dir(ModemMode::C4fm), "dmr");
        assert_eq!(codec_dir(ModemMode::Nxdn), "dmr");
        assert_eq!(codec_dir(ModemMode::Dstar), "dstar");
        assert_eq!(codec_dir(ModemMode::P25), "p25");
    }

    #[test]
    fn resolve_by_first_two_chars() {
        let mut lib = VoiceLibrary::new();
        assert!(lib.insert("srf-male-en", "dmr", "CN-connected.ambe", Bytes::from_static(&[1; 9])));

        let path = lib.resolve(ModemMode::C4fm, VoiceId::MaleEn, *b"CN").unwrap();
        assert_eq!(path, "srf-male-en/dmr/CN-connected.ambe");
        assert_eq!(lib.read_clip(&path).unwrap().len(), 9);

        assert!(lib.resolve(ModemMode::Dstar, VoiceId::MaleEn, *b"CN").is_none());
        assert!(lib.resolve(ModemMode::Dmr, VoiceId::FemaleEn, *b"CN").is_none());
    }

    #[test]
    fn duplicate_pair_keeps_first() {
        let mut lib = VoiceLibrary::new();
        assert!(lib.insert("srf-male-en", "dmr", "AAfirst.ambe", Bytes::from_static(&[1; 9])));
        assert!(!lib.insert("srf-male-en", "dmr", "AAsecond.ambe", Bytes::from_static(&[2; 9])));
        assert_eq!(lib.len(), 1);
    }

    #[test]
    fn unknown_bank_rejected() {
        let mut lib = VoiceLibrary::new();
        assert!(!lib.insert("robot", "dmr", "AA.ambe", Bytes::new()));
        assert!(lib.is_empty());
    }

    #[test]
    fn read_missing_clip_errors() {
        let lib = VoiceLibrary::new();
        assert!(matches!(lib.read_clip("x/y/z.ambe"), Err(SpkError::ClipNotFound(_))));
    }

    #[test]
    fn clip_extension_filter() {
        assert!(is_clip_file("AB.ambe"));
        assert!(is_clip_file("AB.imbe"));
        assert!(!is_clip_file("AB.wav"));
        assert!(!is_clip_file("README"));
    }
}
