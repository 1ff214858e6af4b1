//! Tests for tick progress reporting

#[cfg(test)]
mod tests {
    use mosaicdrift::io::progress::ProgressManager;

    // Tests updates move the bar and format coverage
    // Verified by reporting coverage as a fraction
    #[test]
    fn test_update_sets_position_and_message() {
        let progress = ProgressManager::hidden();

        progress.update(5, 0.5, 2);

        assert_eq!(progress.position(), 5);
        assert_eq!(progress.message(), "coverage  50.0% cycles 2");
        progress.finish();
    }

    // Tests a labelled bar accepts updates
    // Verified by ignoring the tick position
    #[test]
    fn test_labelled_bar() {
        let progress = ProgressManager::new(10, "source.png");

        progress.update(10, 1.0, 0);

        assert_eq!(progress.position(), 10);
        assert_eq!(progress.message(), "coverage 100.0% cycles 0");
        progress.finish();
    }
}
