use sqlx::PgPool;

/// Handle that runs ledger commands against the store.
///
/// Every store command is a plain struct with a
/// `kanau::processor::Processor` impl on this type.
#[derive(Debug, Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}

impl DatabaseProcessor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
