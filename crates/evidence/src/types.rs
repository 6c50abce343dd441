//! 도메인 타입 -- 언어 태그와 공용 별칭
//!
//! 분석 대상 언어는 닫힌 열거형 [`Language`]로 표현되며, 언어별 규칙은
//! [`crate::symbol::SymbolRules`] 구현으로 분기됩니다.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 코드베이스 안에서 선언된 타입/함수 이름 집합
///
/// 이 집합에 있는 심볼은 절대 외부 패키지로 해석하지 않습니다.
pub type UserDefinedTypes = HashSet<String>;

/// 분석 대상 언어
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Java 소스
    Java,
    /// 컴파일된 JVM 아티팩트 (jar)
    Jar,
    /// JavaScript
    JavaScript,
    /// TypeScript
    TypeScript,
    /// Python
    Python,
    /// PHP
    Php,
    /// Ruby
    Ruby,
    /// C
    C,
    /// C++
    Cpp,
    /// Swift
    Swift,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Language {
    /// 문자열에서 언어를 파싱합니다 (대소문자 구분 없음, 별칭 허용).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "java" => Some(Self::Java),
            "jar" => Some(Self::Jar),
            "javascript" | "js" => Some(Self::JavaScript),
            "typescript" | "ts" => Some(Self::TypeScript),
            "python" | "py" => Some(Self::Python),
            "php" => Some(Self::Php),
            "ruby" | "rb" => Some(Self::Ruby),
            "c" => Some(Self::C),
            "cpp" | "c++" => Some(Self::Cpp),
            "swift" => Some(Self::Swift),
            _ => None,
        }
    }

    /// 정규 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Jar => "jar",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Python => "python",
            Self::Php => "php",
            Self::Ruby => "ruby",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Swift => "swift",
        }
    }

    /// JVM 계열 여부
    pub fn is_jvm(&self) -> bool {
        matches!(self, Self::Java | Self::Jar)
    }

    /// JavaScript/TypeScript 계열 여부
    pub fn is_javascript(&self) -> bool {
        matches!(self, Self::JavaScript | Self::TypeScript)
    }
}

/// purl 타입으로부터 언어를 추론합니다.
///
/// maven 컴포넌트는 `file_path`가 `.jar`로 끝나면 [`Language::Jar`]가 됩니다.
/// 형식이 잘못되었거나 알 수 없는 타입이면 `None`을 반환합니다.
pub fn purl_to_language(purl: &str, file_path: Option<&str>) -> Option<Language> {
    let rest = purl.strip_prefix("pkg:")?;
    let purl_type = rest.split('/').next()?.to_lowercase();
    match purl_type.as_str() {
        "maven" => {
            if file_path.is_some_and(|p| p.ends_with(".jar")) {
                Some(Language::Jar)
            } else {
                Some(Language::Java)
            }
        }
        "npm" => Some(Language::JavaScript),
        "pypi" => Some(Language::Python),
        "composer" => Some(Language::Php),
        "gem" => Some(Language::Ruby),
        "generic" => Some(Language::C),
        _ => None,
    }
}

/// `file#line` 형식의 위치 문자열을 만듭니다.
pub fn location(file: &str, line: u64) -> String {
    format!("{file}#{line}")
}
