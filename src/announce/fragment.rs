// author: kodeholic (powered by Claude)
// BrandMeister 상태 → 코드 조각 생성기 (순수 함수, I/O 없음)
//
// 결과 = "BM" + 네트워크 id + static TG + dynamic TG + 반사기
//   네트워크 id : 서버 Name 의 마지막 '/' 뒤 글자마다 "0" 접두 (BrandMeister/2162 → 02010602)
//   static TG  : 1개 LKSTTG, 여러 개 LKSTGS, 사이마다 AN
//   dynamic TG : 1개 LKDNTG, 여러 개 LKDNGS, 사이마다 AN
//   반사기      : 0 / 4000 이 아니면 LKRF + id
// 비어 있는 조각은 통째로 생략

use crate::bm::{ClientStatus, Subscription};
use crate::config;
use crate::core::ServerRecord;

pub fn build_code_fragment(status: &ClientStatus, server: &ServerRecord) -> String {
    let mut out = String::from("BM");
    out.push_str(&network_id_fragment(&server.name));
    out.push_str(&subscription_fragment(&status.static_subscriptions, "LKSTTG", "LKSTGS"));
    out.push_str(&subscription_fragment(&status.dynamic_subscriptions, "LKDNTG", "LKDNGS"));
    out.push_str(&reflector_fragment(status.reflector.active));
    out
}

/// 글자 하나를 "0X" 코드 쌍으로
fn push_digits(out: &mut String, digits: &str) {
    for c in digits.chars() {
        out.push('0');
        out.push(c);
    }
}

fn network_id_fragment(name: &str) -> String {
    let mut out = String::new();
    if let Some(idx) = name.rfind('/') {
        push_digits(&mut out, &name[idx + 1..]);
    }
    out
}

fn subscription_fragment(subs: &[Subscription], single: &str, multi: &str) -> String {
    let mut out = String::new();
    if subs.is_empty() {
        return out;
    }
    out.push_str(if subs.len() == 1 { single } else { multi });
    for (i, sub) in subs.iter().enumerate() {
        if i > 0 {
            out.push_str("AN");
        }
        push_digits(&mut out, &sub.talkgroup.to_string());
    }
    out
}

fn reflector_fragment(active: u32) -> String {
    let mut out = String::new();
    if active != 0 && active != config::REFLECTOR_NONE {
        out.push_str("LKRF");
        push_digits(&mut out, &active.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bm::ReflectorState;

    fn server(name: &str) -> ServerRecord {
        ServerRecord { network: "BrandMeister".into(), name: name.into(), host: "h".into() }
    }

    fn status(active: u32, stat: &[u32], dynamic: &[u32]) -> ClientStatus {
        ClientStatus {
            reflector:             ReflectorState { active },
            static_subscriptions:  stat.iter().map(|tg| Subscription { talkgroup: *tg }).collect(),
            dynamic_subscriptions: dynamic.iter().map(|tg| Subscription { talkgroup: *tg }).collect(),
        }
    }

    #[test]
    fn empty_status_yields_network_only() {
        let s = build_code_fragment(&status(0, &[], &[]), &server("BrandMeister/2162"));
        assert_eq!(s, "BM02010602");
    }

    #[test]
    fn name_without_separator_omits_network_id() {
        let s = build_code_fragment(&status(0, &[], &[]), &server("BrandMeister"));
        assert_eq!(s, "BM");
    }

    #[test]
    fn single_static_talkgroup() {
        let s = build_code_fragment(&status(4000, &[91], &[]), &server("BrandMeister/2162"));
        assert_eq!(s, "BM02010602LKSTTG0901");
    }

    #[test]
    fn multiple_static_and_dynamic() {
        let s = build_code_fragment(&status(0, &[91, 216], &[9]), &server("BM/3"));
        assert_eq!(s, "BM03LKSTGS0901AN020106LKDNTG09");
    }

    #[test]
    fn multiple_dynamic_header() {
        let s = build_code_fragment(&status(0, &[], &[1, 2]), &server("x/"));
        assert_eq!(s, "BMLKDNGS01AN02");
    }

    #[test]
    fn reflector_included_unless_zero_or_4000() {
        assert_eq!(build_code_fragment(&status(4012, &[], &[]), &server("a/1")), "BM01LKRF04000102");
        assert!(!build_code_fragment(&status(4000, &[], &[]), &server("a/1")).contains("LKRF"));
        assert!(!build_code_fragment(&status(0, &[], &[]), &server("a/1")).contains("LKRF"));
    }

    #[test]
    fn deterministic() {
        let st = status(4321, &[1, 2, 3], &[4]);
        let sv = server("BrandMeister/2162");
        assert_eq!(build_code_fragment(&st, &sv), build_code_fragment(&st, &sv));
    }
}
