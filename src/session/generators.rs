use async_trait::async_trait;

/// Source of candidate session names.
///
/// Candidates need not be unique: the service rejects any name that is live
/// or already stored and draws again.
#[async_trait]
pub trait SessionNameGenerator: Send + Sync {
    async fn generate(&self) -> String;
}

/// Three petname words joined by dashes, e.g. `gently-brave-otter`.
///
/// The name is what a second device types in to load the evening, so it
/// stays short and readable rather than a uuid.
#[derive(Debug, Default)]
pub struct PetNameSessionNameGenerator;

impl PetNameSessionNameGenerator {
    const WORDS: u8 = 3;
    const SEPARATOR: &'static str = "-";

    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionNameGenerator for PetNameSessionNameGenerator {
    async fn generate(&self) -> String {
        petname::Petnames::default().generate_one(Self::WORDS, Self::SEPARATOR)
    }
}
