//! Join-code generation.

use crate::domain::foundation::JoinCode;

/// Source of candidate join codes.
///
/// The store checks each candidate for uniqueness and asks again on
/// collision, so an implementation may return duplicates.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> JoinCode;
}

/// Uniformly random codes from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> JoinCode {
        JoinCode::random(&mut rand::thread_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{JOIN_CODE_ALPHABET, JOIN_CODE_LEN};

    #[test]
    fn random_codes_use_the_join_alphabet() {
        let generator = RandomCodeGenerator;
        for _ in 0..50 {
            let code = generator.generate();
            assert_eq!(code.as_str().len(), JOIN_CODE_LEN);
            assert!(code.as_str().bytes().all(|b| JOIN_CODE_ALPHABET.contains(&b)));
        }
    }
}
