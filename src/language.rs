use serde::{Deserialize, Serialize};
use std::path::Path;

/// Desteklenen programlama dilleri
///
/// Dil desteği eklemek için buraya yeni bir varyant, `from_path` içine uzantı
/// eşlemesi ve gerekiyorsa `rules` modülüne bir dedektör tablosu eklemek yeterlidir.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Rust,
    Go,
    Java,
    Kotlin,
    Scala,
    C,
    Cpp,
    CSharp,
    Ruby,
    Php,
    Swift,
    Bash,
    PowerShell,
    Perl,
    Lua,
    Sql,
    Html,
    Css,
    Yaml,
    Json,
    Toml,
    Dockerfile,
    Markdown,
}

impl Language {
    /// Tüm desteklenen diller
    pub const ALL: &'static [Language] = &[
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Rust,
        Language::Go,
        Language::Java,
        Language::Kotlin,
        Language::Scala,
        Language::C,
        Language::Cpp,
        Language::CSharp,
        Language::Ruby,
        Language::Php,
        Language::Swift,
        Language::Bash,
        Language::PowerShell,
        Language::Perl,
        Language::Lua,
        Language::Sql,
        Language::Html,
        Language::Css,
        Language::Yaml,
        Language::Json,
        Language::Toml,
        Language::Dockerfile,
        Language::Markdown,
    ];

    /// Dosya yolundan dili tespit eder
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();

        // Uzantısız özel dosya adları
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name == "Dockerfile" || name.starts_with("Dockerfile.") {
                return Some(Language::Dockerfile);
            }
        }

        let ext = path.extension()?.to_str()?;
        Self::from_extension(ext)
    }

    /// Dosya uzantısından dili tespit eder
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" | "pyw" => Some(Language::Python),
            "js" | "mjs" | "cjs" | "jsx" => Some(Language::JavaScript),
            "ts" | "tsx" => Some(Language::TypeScript),
            "rs" => Some(Language::Rust),
            "go" => Some(Language::Go),
            "java" => Some(Language::Java),
            "kt" | "kts" => Some(Language::Kotlin),
            "scala" => Some(Language::Scala),
            "c" | "h" => Some(Language::C),
            "cpp" | "cc" | "cxx" | "hpp" | "hh" => Some(Language::Cpp),
            "cs" => Some(Language::CSharp),
            "rb" => Some(Language::Ruby),
            "php" => Some(Language::Php),
            "swift" => Some(Language::Swift),
            "sh" | "bash" => Some(Language::Bash),
            "ps1" | "psm1" => Some(Language::PowerShell),
            "pl" | "pm" => Some(Language::Perl),
            "lua" => Some(Language::Lua),
            "sql" => Some(Language::Sql),
            "html" | "htm" => Some(Language::Html),
            "css" | "scss" | "less" => Some(Language::Css),
            "yml" | "yaml" => Some(Language::Yaml),
            "json" => Some(Language::Json),
            "toml" => Some(Language::Toml),
            "md" | "markdown" => Some(Language::Markdown),
            _ => None,
        }
    }

    /// Normalize edilmiş dil tanımlayıcısı
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::Java => "java",
            Language::Kotlin => "kotlin",
            Language::Scala => "scala",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Swift => "swift",
            Language::Bash => "bash",
            Language::PowerShell => "powershell",
            Language::Perl => "perl",
            Language::Lua => "lua",
            Language::Sql => "sql",
            Language::Html => "html",
            Language::Css => "css",
            Language::Yaml => "yaml",
            Language::Json => "json",
            Language::Toml => "toml",
            Language::Dockerfile => "dockerfile",
            Language::Markdown => "markdown",
        }
    }

    /// Dil için yapısal parser bulunup bulunmadığını döndürür
    ///
    /// Parser'ı olmayan diller için analiz, kalıp tabanlı taramayla sınırlıdır.
    pub fn has_structural_parser(&self) -> bool {
        matches!(
            self,
            Language::Python
                | Language::JavaScript
                | Language::TypeScript
                | Language::Rust
                | Language::Go
                | Language::Java
        )
    }

    /// Dilin yorum satırı başlangıcını döndürür
    pub fn line_comment_prefix(&self) -> &'static str {
        match self {
            Language::Python
            | Language::Ruby
            | Language::Bash
            | Language::PowerShell
            | Language::Perl
            | Language::Yaml
            | Language::Toml
            | Language::Dockerfile => "#",
            Language::Lua | Language::Sql => "--",
            Language::Html | Language::Markdown => "<!--",
            Language::Css => "/*",
            _ => "//",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uzantidan_dil_tespiti() {
        assert_eq!(Language::from_path("src/app.py"), Some(Language::Python));
        assert_eq!(Language::from_path("web/index.tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_path("deploy/Dockerfile"), Some(Language::Dockerfile));
        assert_eq!(Language::from_path("notlar.txt"), None);
    }

    #[test]
    fn yapisal_parser_kapsami() {
        assert!(Language::Python.has_structural_parser());
        assert!(Language::Rust.has_structural_parser());
        assert!(!Language::Yaml.has_structural_parser());
        assert!(!Language::Sql.has_structural_parser());
    }
}
