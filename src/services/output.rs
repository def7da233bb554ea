use crate::domain::models::{ErrorBody, JsonErr, JsonOut};
use serde::Serialize;

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    render: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", render(&data));
    }
    Ok(())
}

pub fn print_error(json: bool, code: &str, err: &anyhow::Error) {
    if json {
        let body = JsonErr {
            ok: false,
            error: ErrorBody {
                code: code.to_string(),
                message: format!("{:#}", err),
            },
        };
        match serde_json::to_string_pretty(&body) {
            Ok(s) => println!("{}", s),
            Err(_) => eprintln!("error: {:#}", err),
        }
    } else {
        eprintln!("error: {:#}", err);
    }
}
