use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;

/// 都道府県コード(先頭2桁) -> 都道府県。BTreeMapでコード順の走査を保証する
pub type MasterData = BTreeMap<String, Prefecture>;

#[derive(Debug, Clone, Deserialize)]
pub struct Prefecture {
    pub name: String,
    #[serde(default)]
    pub cities: BTreeMap<String, City>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct City {
    pub name: String,
    /// 6桁の団体コード
    pub code: String,
}

lazy_static! {
    static ref CITY_CODE_RE: Regex = Regex::new(r"^\d{6}$").unwrap();
}

/// 団体コードが6桁の数字かどうか
pub fn is_valid_city_code(code: &str) -> bool {
    CITY_CODE_RE.is_match(code)
}

/// 団体コードから都道府県コード(先頭2桁)を取り出す
pub fn prefecture_code(code: &str) -> Option<&str> {
    if is_valid_city_code(code) {
        Some(&code[..2])
    } else {
        None
    }
}

/// 双方向の部分文字列一致
fn loose_match(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// 逆ジオコーディング結果(都道府県名・市区町村名)からマスタ上の市区町村を引く。
/// どちらの名前も双方向の部分一致で照合するため、別都道府県に似た名前の
/// 市区町村があると誤マッチしうる(既知の曖昧さ、原典の挙動をそのまま維持)。
/// コード順の最初の一致を返す
pub fn find_city<'a>(master: &'a MasterData, pref_name: &str, city_name: &str) -> Option<&'a City> {
    for prefecture in master.values() {
        if !loose_match(&prefecture.name, pref_name) {
            continue;
        }
        for city in prefecture.cities.values() {
            if loose_match(&city.name, city_name) {
                return Some(city);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_master() -> MasterData {
        serde_json::from_str(
            r#"{
                "01": {
                    "name": "北海道",
                    "cities": {
                        "011002": { "name": "札幌市", "code": "011002" },
                        "012025": { "name": "函館市", "code": "012025" }
                    }
                },
                "13": {
                    "name": "東京都",
                    "cities": {
                        "131016": { "name": "千代田区", "code": "131016" }
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn validates_six_digit_codes() {
        assert!(is_valid_city_code("011002"));
        assert!(!is_valid_city_code("01100"));
        assert!(!is_valid_city_code("0110022"));
        assert!(!is_valid_city_code("abcdef"));
        assert!(!is_valid_city_code(""));
    }

    #[test]
    fn extracts_prefecture_code() {
        assert_eq!(prefecture_code("011002"), Some("01"));
        assert_eq!(prefecture_code("131016"), Some("13"));
        assert_eq!(prefecture_code("11002"), None);
    }

    #[test]
    fn finds_city_by_exact_names() {
        let master = sample_master();
        let city = find_city(&master, "北海道", "札幌市").unwrap();
        assert_eq!(city.code, "011002");
    }

    #[test]
    fn finds_city_by_partial_names() {
        let master = sample_master();
        // 逆ジオコーディングは「札幌市中央区」のような粒度で返すことがある
        let city = find_city(&master, "北海道", "札幌市中央区").unwrap();
        assert_eq!(city.code, "011002");
        // 都道府県名側の部分一致
        let city = find_city(&master, "東京", "千代田区").unwrap();
        assert_eq!(city.code, "131016");
    }

    #[test]
    fn unknown_names_find_nothing() {
        let master = sample_master();
        assert!(find_city(&master, "沖縄県", "那覇市").is_none());
        assert!(find_city(&master, "北海道", "旭川市").is_none());
        assert!(find_city(&master, "", "札幌市").is_none());
    }
}
