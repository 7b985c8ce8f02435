//! PostgreSQL sale store

use super::SaleStore;
use crate::model::{Agent, Installment, Passenger, Sale, SaleId, SaleRecord, SubService};
use crate::reference::ReferenceTable;
use crate::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const SALE_QUERY: &str = r#"
    SELECT id, client_name, address, fiscal_code, payment_reference, itinerary, service,
           payment_method, net_cost, sale_price, deposit_paid, balance_due, agent_fee,
           created_at, created_by
    FROM sales
    WHERE id = $1
"#;

const PASSENGERS_QUERY: &str = r#"
    SELECT name, net_cost, sale_price,
           has_insurance, insurance_net, insurance_sale,
           has_express, express_net, express_sale,
           status, payment_date, activation_date
    FROM sale_passengers
    WHERE sale_id = $1
    ORDER BY id ASC
"#;

const INSTALLMENTS_QUERY: &str = r#"
    SELECT number, amount, due_date, paid
    FROM sale_installments
    WHERE sale_id = $1
    ORDER BY number ASC
"#;

const AGENT_QUERY: &str = "SELECT first_name, last_name, email FROM users WHERE id = $1";

/// One snapshot for every query of a fetch
const SNAPSHOT_STATEMENT: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

/// Schema; amounts are unconstrained `NUMERIC` so values keep the scale they were stored with
const MIGRATION_SQL: &str = include_str!("../../migrations/001_init.sql");

/// Flat passenger row as stored
#[derive(Debug, sqlx::FromRow)]
struct PassengerRow {
    name: Option<String>,
    net_cost: Option<Decimal>,
    sale_price: Option<Decimal>,
    has_insurance: bool,
    insurance_net: Option<Decimal>,
    insurance_sale: Option<Decimal>,
    has_express: bool,
    express_net: Option<Decimal>,
    express_sale: Option<Decimal>,
    status: Option<String>,
    payment_date: Option<String>,
    activation_date: Option<String>,
}

impl From<PassengerRow> for Passenger {
    fn from(row: PassengerRow) -> Self {
        let sub_service = |enabled: bool, net: Option<Decimal>, sale: Option<Decimal>| {
            enabled.then(|| SubService {
                net: net.unwrap_or_default(),
                sale: sale.unwrap_or_default(),
            })
        };

        Passenger {
            insurance: sub_service(row.has_insurance, row.insurance_net, row.insurance_sale),
            express: sub_service(row.has_express, row.express_net, row.express_sale),
            name: row.name,
            net_cost: row.net_cost,
            sale_price: row.sale_price,
            status: row.status,
            payment_date: row.payment_date,
            activation_date: row.activation_date,
        }
    }
}

/// Sale store over a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgSaleStore {
    pool: PgPool,
}

impl PgSaleStore {
    /// Open a connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the schema if it does not exist yet
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::raw_sql(MIGRATION_SQL).execute(&self.pool).await?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Delete every row of an allow-listed reference table
    ///
    /// Returns the number of deleted rows.
    pub async fn reset_reference_table(&self, table: ReferenceTable) -> Result<u64> {
        let result = sqlx::query(table.delete_statement())
            .execute(&self.pool)
            .await?;
        info!(table = %table, rows = result.rows_affected(), "reference table reset");
        Ok(result.rows_affected())
    }

    /// Close the pool, waiting for connections to be returned
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SaleStore for PgSaleStore {
    async fn fetch_sale(&self, id: SaleId) -> Result<Option<SaleRecord>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(SNAPSHOT_STATEMENT).execute(&mut *tx).await?;

        let Some(sale) = sqlx::query_as::<_, Sale>(SALE_QUERY)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.commit().await?;
            return Ok(None);
        };

        let passengers = sqlx::query_as::<_, PassengerRow>(PASSENGERS_QUERY)
            .bind(id)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .map(Passenger::from)
            .collect();

        let installments = sqlx::query_as::<_, Installment>(INSTALLMENTS_QUERY)
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

        let agent = match sale.created_by {
            Some(user_id) => {
                sqlx::query_as::<_, Agent>(AGENT_QUERY)
                    .bind(user_id)
                    .fetch_optional(&mut *tx)
                    .await?
            }
            None => None,
        };

        tx.commit().await?;

        Ok(Some(SaleRecord {
            sale,
            passengers,
            installments,
            agent,
        }))
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
