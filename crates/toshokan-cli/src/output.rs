use toshokan_core::models::Release;

/// One line per release: seeders, size, title.
pub fn release_line(release: &Release) -> String {
    format!(
        "{:>6}  {:>10}  {}",
        release.seeders,
        release.size.as_deref().unwrap_or("?"),
        release.title.as_deref().unwrap_or(&release.hash)
    )
}
