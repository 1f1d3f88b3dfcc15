use crate::errors::IntegrationError;
use crate::models::{IntegrationResult, Issue, IssueType, ScanResult, SeverityCounts};
use crate::utils;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Öncelik stratejileri
///
/// Her strateji, birleştirilmiş küme üzerinde parmak iziyle kararlılaştırılmış
/// bir toplam sıralamadır.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriorityStrategy {
    /// Önem seviyesi azalan, sonra dosya yolu ve satır
    SeverityFirst,

    /// Düşük eforlu sorunlar önce (hızlı kazanımlar)
    EasyWinFirst,

    /// Önem ve eforun ağırlıklı birleşimi
    Balanced,

    /// Sorun tipinin iş etkisi tablosuna göre
    ImpactFirst,
}

/// Entegrasyon yapılandırması
///
/// Benzerlik eşiği ve tip öncelik tablosu, koddan değil buradan ayarlanır.
#[derive(Debug, Clone)]
pub struct IntegratorConfig {
    /// Yakın kopya araması için satır penceresi
    pub near_line_window: usize,

    /// Bu değerin üzerindeki açıklama benzerliği birleştirme kabul edilir
    pub similarity_threshold: f64,

    /// Çakışma çözümünde tip belirginliği; öndeki tip kazanır
    pub type_specificity: Vec<IssueType>,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            near_line_window: 3,
            similarity_threshold: 0.6,
            type_specificity: vec![
                IssueType::SecurityVulnerability,
                IssueType::PerformanceIssue,
                IssueType::MaintainabilityIssue,
                IssueType::DocumentationIssue,
                IssueType::BestPracticeViolation,
                IssueType::CodeSmell,
                IssueType::LinterError,
                IssueType::CodeQuality,
            ],
        }
    }
}

/// Birleştirme sırasında tutulan iç kayıt
struct MergedEntry {
    issue: Issue,
    source_order: usize,
}

/// Bağımsız tarama sonuçlarını birleştiren entegratör
///
/// Çağrılar arasında durum tutmaz; girdi Issue'ları asla değiştirilmez,
/// birleştirme yeni bir Issue kurar.
pub struct Integrator {
    config: IntegratorConfig,
}

impl Integrator {
    /// Yeni bir Integrator örneği oluşturur
    pub fn new(config: IntegratorConfig) -> Self {
        Self { config }
    }

    /// N bağımsız tarama sonucunu tek bir sıralı kümeye entegre eder
    ///
    /// Geçersiz girdiler elenip raporlanır; hiçbir girdi geçerli değilse
    /// tipli hata döner.
    pub fn integrate(
        &self,
        scan_results: &[ScanResult],
        dedupe: bool,
        strategy: PriorityStrategy,
    ) -> Result<IntegrationResult, IntegrationError> {
        let (valid, dropped_sources) = self.validate_inputs(scan_results);

        if valid.is_empty() && !scan_results.is_empty() {
            return Err(IntegrationError::AllSourcesInvalid {
                dropped: dropped_sources,
            });
        }

        let total_input: usize = valid.iter().map(|r| r.issues.len()).sum();
        info!(
            "{} kaynaktan {} sorun entegre ediliyor",
            valid.len(),
            total_input
        );

        let merged = if dedupe {
            self.merge_issues(&valid)
        } else {
            valid
                .iter()
                .flat_map(|r| r.issues.iter().cloned())
                .collect()
        };

        let duplicates_removed = total_input - merged.len();
        debug!("{} kopya elendi", duplicates_removed);

        // Dağılımlar sıralamadan önce, birleştirilmiş küme üzerinde bir kez
        // hesaplanır
        let severity_distribution = SeverityCounts::from_issues(&merged);
        let mut issue_type_distribution = BTreeMap::new();
        for issue in &merged {
            *issue_type_distribution
                .entry(issue.issue_type.as_str().to_string())
                .or_insert(0) += 1;
        }

        let mut issues = merged;
        self.sort_by_strategy(&mut issues, strategy);

        Ok(IntegrationResult {
            issues,
            duplicates_removed,
            severity_distribution,
            issue_type_distribution,
            source_count: valid.len(),
            dropped_sources,
        })
    }

    /// Geçersiz tarama sonuçlarını eler
    ///
    /// Boş kaynak adı veya 0 satır numaralı sorun, bozulmuş girdi işaretidir.
    fn validate_inputs<'a>(
        &self,
        scan_results: &'a [ScanResult],
    ) -> (Vec<&'a ScanResult>, Vec<String>) {
        let mut valid = Vec::new();
        let mut dropped = Vec::new();

        for (index, result) in scan_results.iter().enumerate() {
            let malformed = result.source.is_empty() || result.issues.iter().any(|i| i.line == 0);

            if malformed {
                let label = if result.source.is_empty() {
                    format!("<adsız-kaynak-{}>", index)
                } else {
                    result.source.clone()
                };
                warn!("Geçersiz tarama sonucu eleniyor: {}", label);
                dropped.push(label);
            } else {
                valid.push(result);
            }
        }

        (valid, dropped)
    }

    /// Parmak izi ve benzerlik tabanlı birleştirme
    fn merge_issues(&self, valid: &[&ScanResult]) -> Vec<Issue> {
        let mut entries: Vec<MergedEntry> = Vec::new();
        let mut fingerprint_index: HashMap<u64, usize> = HashMap::new();
        let mut location_index: HashMap<(String, IssueType), Vec<usize>> = HashMap::new();

        for (source_order, result) in valid.iter().enumerate() {
            for issue in &result.issues {
                let fingerprint = issue.fingerprint();

                // Kesin kopya: aynı parmak izi
                if let Some(&slot) = fingerprint_index.get(&fingerprint) {
                    let merged = self.resolve_conflict(&entries[slot], issue, source_order);
                    entries[slot] = merged;
                    continue;
                }

                // Yakın kopya: aynı dosya ve tip, küçük satır penceresi,
                // yeterli açıklama benzerliği
                let location_key = (utils::normalize_path(&issue.file_path), issue.issue_type);
                let near_slot = location_index.get(&location_key).and_then(|slots| {
                    slots
                        .iter()
                        .copied()
                        .find(|&slot| self.is_near_duplicate(&entries[slot].issue, issue))
                });

                if let Some(slot) = near_slot {
                    let merged = self.resolve_conflict(&entries[slot], issue, source_order);
                    entries[slot] = merged;
                    // Kazanan tarafın parmak izi de aynı yuvaya işaret etsin
                    fingerprint_index.insert(entries[slot].issue.fingerprint(), slot);
                    continue;
                }

                // Yeni, ayrık bulgu
                let slot = entries.len();
                entries.push(MergedEntry {
                    issue: issue.clone(),
                    source_order,
                });
                fingerprint_index.insert(fingerprint, slot);
                location_index.entry(location_key).or_default().push(slot);
            }
        }

        // Kazanan taraf bir yuvanın satırını taşıyabilir ve önceden ayrık iki
        // yuva pencere içine girebilir; küme kararlı olana dek birleştirme
        // tekrarlanır
        loop {
            let merge_pair = entries.iter().enumerate().find_map(|(i, a)| {
                entries[i + 1..].iter().position(|b| {
                    a.issue.fingerprint() == b.issue.fingerprint()
                        || self.is_near_duplicate(&a.issue, &b.issue)
                })
                .map(|offset| (i, i + 1 + offset))
            });

            match merge_pair {
                Some((i, j)) => {
                    let incoming = entries.remove(j);
                    let merged =
                        self.resolve_conflict(&entries[i], &incoming.issue, incoming.source_order);
                    entries[i] = merged;
                }
                None => break,
            }
        }

        entries.into_iter().map(|e| e.issue).collect()
    }

    /// İki bulgunun yakın kopya sayılıp sayılmadığını döndürür
    fn is_near_duplicate(&self, a: &Issue, b: &Issue) -> bool {
        a.issue_type == b.issue_type
            && utils::normalize_path(&a.file_path) == utils::normalize_path(&b.file_path)
            && a.line.abs_diff(b.line) <= self.config.near_line_window
            && description_similarity(&a.description, &b.description)
                >= self.config.similarity_threshold
    }

    /// Çakışan iki bulgudan kazananı seçip yeni bir birleşik Issue kurar
    ///
    /// Politika sırası: önem (azalan) > tip belirginliği > en erken kaynak.
    /// Uyumluluk etiketleri her durumda birleştirilir.
    fn resolve_conflict(
        &self,
        kept: &MergedEntry,
        incoming: &Issue,
        incoming_order: usize,
    ) -> MergedEntry {
        let incoming_wins = match incoming.severity.cmp(&kept.issue.severity) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => {
                let kept_rank = self.specificity_rank(kept.issue.issue_type);
                let incoming_rank = self.specificity_rank(incoming.issue_type);
                // Daha küçük sıra daha belirgindir; eşitlikte erken kaynak kalır
                incoming_rank < kept_rank
            }
        };

        let (winner, loser) = if incoming_wins {
            (incoming, &kept.issue)
        } else {
            (&kept.issue, incoming)
        };

        let mut merged = winner.clone();
        merged
            .compliance_tags
            .extend(loser.compliance_tags.iter().cloned());
        for (key, value) in &loser.context {
            merged
                .context
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }

        MergedEntry {
            issue: merged,
            source_order: kept.source_order.min(incoming_order),
        }
    }

    /// Tip belirginlik sırası; tabloda olmayan tipler en sona düşer
    fn specificity_rank(&self, issue_type: IssueType) -> usize {
        self.config
            .type_specificity
            .iter()
            .position(|&t| t == issue_type)
            .unwrap_or(self.config.type_specificity.len())
    }

    /// Seçilen stratejiye göre toplam sıralama uygular
    fn sort_by_strategy(&self, issues: &mut [Issue], strategy: PriorityStrategy) {
        match strategy {
            PriorityStrategy::SeverityFirst => {
                issues.sort_by(|a, b| {
                    b.severity
                        .cmp(&a.severity)
                        .then_with(|| a.file_path.cmp(&b.file_path))
                        .then_with(|| a.line.cmp(&b.line))
                        .then_with(|| a.fingerprint().cmp(&b.fingerprint()))
                });
            }
            PriorityStrategy::EasyWinFirst => {
                issues.sort_by(|a, b| {
                    effort_score(a)
                        .cmp(&effort_score(b))
                        .then_with(|| b.severity.cmp(&a.severity))
                        .then_with(|| a.fingerprint().cmp(&b.fingerprint()))
                });
            }
            PriorityStrategy::Balanced => {
                issues.sort_by(|a, b| {
                    balanced_score(b)
                        .cmp(&balanced_score(a))
                        .then_with(|| b.severity.cmp(&a.severity))
                        .then_with(|| a.fingerprint().cmp(&b.fingerprint()))
                });
            }
            PriorityStrategy::ImpactFirst => {
                issues.sort_by(|a, b| {
                    impact_weight(b.issue_type)
                        .cmp(&impact_weight(a.issue_type))
                        .then_with(|| b.severity.cmp(&a.severity))
                        .then_with(|| a.fingerprint().cmp(&b.fingerprint()))
                });
            }
        }
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(IntegratorConfig::default())
    }
}

/// Açıklama benzerliği: normalize edilmiş sözcük kümeleri üzerinde Jaccard
fn description_similarity(a: &str, b: &str) -> f64 {
    let a_norm = utils::normalize_text(a);
    let b_norm = utils::normalize_text(b);

    let a_tokens: HashSet<&str> = a_norm.split(' ').filter(|t| !t.is_empty()).collect();
    let b_tokens: HashSet<&str> = b_norm.split(' ').filter(|t| !t.is_empty()).collect();

    if a_tokens.is_empty() && b_tokens.is_empty() {
        return 1.0;
    }

    let intersection = a_tokens.intersection(&b_tokens).count();
    let union = a_tokens.union(&b_tokens).count();

    intersection as f64 / union as f64
}

/// Türetilmiş efor puanı; düşük puan kolay kazanım demektir
fn effort_score(issue: &Issue) -> u32 {
    let mut score = (issue.severity as u32) * 30;

    let snippet_chars = issue.code_snippet.chars().count();
    if snippet_chars > 200 {
        score += 20;
    } else if snippet_chars > 80 {
        score += 10;
    }

    // Fonksiyon bağlamına bağlı bulgular yapısal bağımlılık taşır
    if issue.context.contains_key("function_name") {
        score += 30;
    }

    score
}

/// Önem ve eforun ağırlıklı birleşimi; yüksek puan önce gelir
fn balanced_score(issue: &Issue) -> i64 {
    let severity_norm = (issue.severity as i64) * 100 / 3;
    let effort_norm = (effort_score(issue) as i64).min(100);

    60 * severity_norm + 40 * (100 - effort_norm)
}

/// Sorun tipinin iş etkisi ağırlığı
fn impact_weight(issue_type: IssueType) -> u32 {
    match issue_type {
        IssueType::SecurityVulnerability => 100,
        IssueType::PerformanceIssue => 80,
        IssueType::MaintainabilityIssue => 60,
        IssueType::DocumentationIssue => 40,
        IssueType::BestPracticeViolation => 35,
        IssueType::CodeSmell => 30,
        IssueType::LinterError => 25,
        IssueType::CodeQuality => 20,
    }
}
