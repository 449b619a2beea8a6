/// Hands the participant back to the login flow.
///
/// Invoked when the progress service rejects the credential or no identity is
/// available at all. What "redirect" means is up to the host.
pub trait AuthRedirectPort: Send + Sync {
    fn redirect_to_login(&self);
}
