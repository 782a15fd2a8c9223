/// Input for creating a user. `password` is the plaintext; the credential
/// store hashes it before anything is written.
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}
