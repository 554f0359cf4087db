use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdGeneratorError {
    #[error("one-time id {0} was already handed out")]
    AlreadyUsed(i64),
    #[error("no payment ids can be generated in this context")]
    Unavailable,
}

/// Mints payment ids. Called once per payment the converter starts.
pub trait IdGenerator: Send {
    fn new_id(&mut self) -> Result<i64, IdGeneratorError>;
}

/// Hands out `next, next + 1, ...`. Seed it from the highest persisted
/// payment id so minted ids never collide with existing rows.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: i64,
}

impl SequentialIdGenerator {
    pub fn starting_at(next: i64) -> Self { Self { next } }
}

impl IdGenerator for SequentialIdGenerator {
    fn new_id(&mut self) -> Result<i64, IdGeneratorError> {
        let id = self.next;
        self.next += 1;
        Ok(id)
    }
}

#[derive(Debug)]
pub struct OneTimeIdGenerator {
    id: i64,
    used: bool,
}

impl OneTimeIdGenerator {
    pub fn new(id: i64) -> Self { Self { id, used: false } }
}

impl IdGenerator for OneTimeIdGenerator {
    fn new_id(&mut self) -> Result<i64, IdGeneratorError> {
        if self.used {
            return Err(IdGeneratorError::AlreadyUsed(self.id));
        }
        self.used = true;
        Ok(self.id)
    }
}

#[derive(Debug, Default)]
pub struct NullIdGenerator;

impl IdGenerator for NullIdGenerator {
    fn new_id(&mut self) -> Result<i64, IdGeneratorError> { Err(IdGeneratorError::Unavailable) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_counts_up_from_seed() {
        let mut g = SequentialIdGenerator::starting_at(41);
        assert_eq!(g.new_id(), Ok(41));
        assert_eq!(g.new_id(), Ok(42));
        assert_eq!(g.new_id(), Ok(43));
    }

    #[test]
    fn one_time_fails_on_second_call() {
        let mut g = OneTimeIdGenerator::new(7);
        assert_eq!(g.new_id(), Ok(7));
        assert_eq!(g.new_id(), Err(IdGeneratorError::AlreadyUsed(7)));
    }

    #[test]
    fn null_never_mints() {
        assert_eq!(NullIdGenerator.new_id(), Err(IdGeneratorError::Unavailable));
    }
}
