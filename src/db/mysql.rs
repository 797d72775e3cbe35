use mysql_async::prelude::Queryable;
use mysql_async::{OptsBuilder, Pool, Row, Value as SqlValue};
use serde_json::Value;

use super::{FieldInfo, QueryOutcome, RowMap, SqlExecutor};
use crate::config::{DatabaseConfig, DatabaseKind};

pub struct MysqlExecutor {
    pool: Pool,
}

impl MysqlExecutor {
    /// Pool construction is lazy; the first statement opens the connection.
    pub fn new(config: &DatabaseConfig) -> Self {
        let opts = OptsBuilder::default()
            .ip_or_hostname(config.host.clone())
            .tcp_port(config.port)
            .user(Some(config.user.clone()))
            .pass(Some(config.password.clone()))
            .db_name(Some(config.database.clone()));

        log::info!(
            "MySQL pool configured for {}:{}/{}",
            config.host,
            config.port,
            config.database
        );
        Self {
            pool: Pool::new(opts),
        }
    }
}

#[async_trait::async_trait]
impl SqlExecutor for MysqlExecutor {
    async fn execute(&self, sql: &str) -> QueryOutcome {
        let mut conn = match self.pool.get_conn().await {
            Ok(conn) => conn,
            Err(e) => return failure(e),
        };

        let mut result = match conn.query_iter(sql).await {
            Ok(result) => result,
            Err(e) => return failure(e),
        };

        let fields: Vec<FieldInfo> = result
            .columns()
            .map(|columns| {
                columns
                    .iter()
                    .map(|column| FieldInfo {
                        name: column.name_str().into_owned(),
                        type_name: format!("{:?}", column.column_type()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let rows: Vec<Row> = match result.collect().await {
            Ok(rows) => rows,
            Err(e) => return failure(e),
        };

        // DML statements produce no rows; report the affected count instead.
        let row_count = if rows.is_empty() {
            result.affected_rows() as usize
        } else {
            rows.len()
        };

        let data = rows
            .into_iter()
            .map(|row| row_to_json(row, &fields))
            .collect();

        QueryOutcome::Success {
            data,
            row_count,
            fields,
        }
    }

    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Mysql
    }
}

fn failure(error: mysql_async::Error) -> QueryOutcome {
    let code = match &error {
        mysql_async::Error::Server(server) => Some(server.code.to_string()),
        _ => None,
    };
    QueryOutcome::Failure {
        error: error.to_string(),
        code,
    }
}

fn row_to_json(row: Row, fields: &[FieldInfo]) -> RowMap {
    let mut map = RowMap::new();
    for (field, value) in fields.iter().zip(row.unwrap()) {
        map.insert(field.name.clone(), sql_value_to_json(value));
    }
    map
}

fn sql_value_to_json(value: SqlValue) -> Value {
    match value {
        SqlValue::NULL => Value::Null,
        SqlValue::Bytes(bytes) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        SqlValue::Int(v) => Value::from(v),
        SqlValue::UInt(v) => Value::from(v),
        SqlValue::Float(v) => Value::from(f64::from(v)),
        SqlValue::Double(v) => Value::from(v),
        SqlValue::Date(year, month, day, 0, 0, 0, 0) => {
            Value::String(format!("{year:04}-{month:02}-{day:02}"))
        }
        SqlValue::Date(year, month, day, hour, minute, second, micro) => Value::String(format!(
            "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{micro:06}"
        )),
        SqlValue::Time(negative, days, hours, minutes, seconds, micro) => {
            let sign = if negative { "-" } else { "" };
            let total_hours = u32::from(hours) + days * 24;
            Value::String(format!(
                "{sign}{total_hours:02}:{minutes:02}:{seconds:02}.{micro:06}"
            ))
        }
    }
}
