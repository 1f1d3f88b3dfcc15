use std::path::PathBuf;
use thiserror::Error;

/// Tarama seviyesinde ölümcül hatalar
///
/// Dosya başına kurtarılabilir hatalar buraya düşmez; onlar LinterError tipinde
/// birer Issue'ya çevrilir ve tarama devam eder.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Kök yol bulunamadı veya erişilemedi
    #[error("Kök yol geçersiz: {0:?}")]
    InvalidRoot(PathBuf),

    /// Dizin dolaşılamadı
    #[error("Dizin dolaşılamadı: {0}")]
    Walk(#[from] ignore::Error),

    /// İşçi havuzu oluşturulamadı
    #[error("İşçi havuzu oluşturulamadı: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Entegrasyon seviyesinde hatalar
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// Girdi olarak verilen hiçbir tarama sonucu geçerli değil
    #[error("Geçerli tarama sonucu yok; elenen kaynaklar: {dropped:?}")]
    AllSourcesInvalid { dropped: Vec<String> },
}
