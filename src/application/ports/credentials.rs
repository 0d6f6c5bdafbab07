/// Access credential for the transformation service, resolved at the
/// moment each job starts so a key supplied after a failure takes effect
/// without a restart.
pub trait CredentialProvider: Send + Sync {
    fn api_key(&self) -> Option<String>;
}
