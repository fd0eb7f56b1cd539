// Employer-side endpoints: posting jobs and reviewing applicants.

pub mod handlers;

use uuid::Uuid;

/// `kanso-` followed by 8 hex characters.
pub fn new_job_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("kanso-{}", &hex[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_format() {
        let id = new_job_id();
        let suffix = id.strip_prefix("kanso-").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(new_job_id(), id);
    }
}
