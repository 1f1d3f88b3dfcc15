//! codeleaks - Çok dilli statik analiz kütüphanesi
//!
//! Kaynak ağaçlarını eşzamanlı tarar, dil başına desen kütüphanesi ve
//! sığ yapısal analizle sorun üretir, bağımsız tarama sonuçlarını
//! tekilleştirip önceliklendirir. Raporlama ve komut satırı yüzeyleri bu
//! kütüphanenin dışındadır; buradaki her şey `ScanResult` ve
//! `IntegrationResult` değerleri üzerinden konuşur.

pub mod analyzer;
pub mod errors;
pub mod integrator;
pub mod language;
pub mod linter;
pub mod models;
pub mod parser;
pub mod rules;
pub mod scanner;
pub mod utils;

pub use analyzer::{AnalyzerConfig, FileAnalyzer};
pub use errors::{IntegrationError, ScanError};
pub use integrator::{Integrator, IntegratorConfig, PriorityStrategy};
pub use language::Language;
pub use linter::{LinterCommand, LinterRegistry};
pub use models::{
    IntegrationResult, Issue, IssueType, ScanResult, ScanSummary, Severity, SeverityCounts,
};
pub use rules::{Category, PatternLibrary};
pub use scanner::{CancellationToken, ScanConfig, Scanner};
