use std::path::Path;

/// Bir karakter dizisinde kaç satır olduğunu sayar
pub fn count_lines(s: &str) -> usize {
    s.lines().count()
}

/// İlgili satır numarasını kullanarak sınırlı bir kod parçası (snippet) alır
///
/// Satır numarası 1 tabanlıdır; pencere, satırın `context_lines` öncesi ve
/// sonrasını kapsar.
pub fn get_code_snippet(content: &str, line: usize, context_lines: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start_line = if line > context_lines + 1 { line - context_lines - 1 } else { 0 };
    let end_line = std::cmp::min(line + context_lines, lines.len());

    if start_line >= end_line {
        return String::new();
    }

    lines[start_line..end_line].join("\n")
}

/// Karakter sınırlarına saygı göstererek bir metni en fazla `max_chars` karaktere kısaltır
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }

    s.chars().take(max_chars).collect()
}

/// Parmak izi hesaplaması için dosya yolunu normalize eder
///
/// Platformdan bağımsız olması için ayraçlar ileri eğik çizgiye çevrilir.
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// Benzerlik karşılaştırması için metni normalize eder
///
/// Küçük harfe çevirir ve ardışık boşlukları tek boşluğa indirger.
pub fn normalize_text(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Karakterleri çevreleyen tırnak işaretlerini kaldırır
pub fn strip_quotes(s: &str) -> &str {
    let s = s.trim();

    if s.len() >= 2
        && ((s.starts_with('\'') && s.ends_with('\'')) || (s.starts_with('"') && s.ends_with('"')))
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}
