use serde_json::Value;
use tokio_postgres::types::Type;
use tokio_postgres::{Client, NoTls, Row};

use super::{FieldInfo, GatewayError, QueryOutcome, RowMap, SqlExecutor};
use crate::config::{DatabaseConfig, DatabaseKind};

pub struct PostgresExecutor {
    client: Client,
}

impl PostgresExecutor {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, GatewayError> {
        let mut pg = tokio_postgres::Config::new();
        pg.host(&config.host)
            .port(config.port)
            .user(&config.user)
            .password(&config.password)
            .dbname(&config.database);

        let (client, connection) = pg.connect(NoTls).await?;

        // The connection object drives the socket; run it to completion in
        // the background.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("PostgreSQL connection error: {}", e);
            }
        });

        log::info!(
            "Connected to PostgreSQL at {}:{}/{}",
            config.host,
            config.port,
            config.database
        );
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl SqlExecutor for PostgresExecutor {
    async fn execute(&self, sql: &str) -> QueryOutcome {
        let statement = match self.client.prepare(sql).await {
            Ok(statement) => statement,
            Err(e) => return failure(e),
        };

        let rows = match self.client.query(&statement, &[]).await {
            Ok(rows) => rows,
            Err(e) => return failure(e),
        };

        let fields = statement
            .columns()
            .iter()
            .map(|column| FieldInfo {
                name: column.name().to_string(),
                type_name: column.type_().to_string(),
            })
            .collect();

        let row_count = rows.len();
        let data = rows.iter().map(row_to_json).collect();

        QueryOutcome::Success {
            data,
            row_count,
            fields,
        }
    }

    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Postgres
    }
}

fn failure(error: tokio_postgres::Error) -> QueryOutcome {
    let code = error
        .as_db_error()
        .map(|db| db.code().code().to_string());
    QueryOutcome::Failure {
        error: error.to_string(),
        code,
    }
}

fn row_to_json(row: &Row) -> RowMap {
    let mut map = RowMap::new();
    for (idx, column) in row.columns().iter().enumerate() {
        map.insert(column.name().to_string(), cell_value(row, idx, column.type_()));
    }
    map
}

/// Convert one cell to JSON based on its declared type. Types outside the
/// common set fall back to a textual representation; anything the driver
/// cannot decode renders as null.
fn cell_value(row: &Row, idx: usize, ty: &Type) -> Value {
    match ty {
        t if *t == Type::BOOL => get(row, idx, Value::Bool),
        t if *t == Type::INT2 => get(row, idx, |v: i16| Value::from(v)),
        t if *t == Type::INT4 => get(row, idx, |v: i32| Value::from(v)),
        t if *t == Type::INT8 => get(row, idx, |v: i64| Value::from(v)),
        t if *t == Type::FLOAT4 => get(row, idx, |v: f32| Value::from(f64::from(v))),
        t if *t == Type::FLOAT8 => get(row, idx, |v: f64| Value::from(v)),
        t if *t == Type::DATE => get(row, idx, |v: chrono::NaiveDate| {
            Value::String(v.to_string())
        }),
        t if *t == Type::TIMESTAMP => get(row, idx, |v: chrono::NaiveDateTime| {
            Value::String(v.to_string())
        }),
        t if *t == Type::TIMESTAMPTZ => get(row, idx, |v: chrono::DateTime<chrono::Utc>| {
            Value::String(v.to_rfc3339())
        }),
        t if *t == Type::JSON || *t == Type::JSONB => get(row, idx, |v: Value| v),
        _ => get(row, idx, Value::String),
    }
}

fn get<'a, T>(row: &'a Row, idx: usize, to_json: impl Fn(T) -> Value) -> Value
where
    T: tokio_postgres::types::FromSql<'a>,
{
    match row.try_get::<_, Option<T>>(idx) {
        Ok(Some(value)) => to_json(value),
        Ok(None) => Value::Null,
        Err(e) => {
            log::debug!("could not decode column {}: {}", idx, e);
            Value::Null
        }
    }
}
