//! Console commands.

mod render;

pub use render::{render_corte, render_dropdown, render_estado, render_table};

use std::str::FromStr;

use agua_lib::model::MetodoPago;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

pub const HELP: &str = "\
Comandos:
  login <usuario> [password]     Inicia sesión
  logout                         Cierra la sesión
  cuentas                        Recarga y muestra los cuentahabientes
  buscar [texto]                 Filtra por texto (sin texto limpia la búsqueda)
  filtro <id>                    Aplica un filtro: all, activos, bajas,
                                 domestica, comercial, industrial
  pagina <n> | siguiente | anterior
  alta                           Registra un cuentahabiente
  editar <id>                    Edita un cuentahabiente
  borrar <id>                    Elimina un cuentahabiente
  pago <cuenta> <monto> [metodo] [descuento]
                                 Registra un pago (efectivo, tarjeta, transferencia)
  asignar <cuenta> <cobrador>    Asigna cobrador (\"ninguno\" lo quita)
  descuentos [nuevo | borrar <id>]
                                 Lista, registra o elimina descuentos
  cargos <cuenta> [nuevo | borrar <id>]
                                 Lista, registra o elimina cargos de una cuenta
  corte <desde> <hasta>          Corte de caja, fechas AAAA-MM-DD
  estado <cuenta>                Estado de cuenta
  ayuda | salir";

/// What to do with a secondary catalog (discounts, charges).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accion {
    Listar,
    Nuevo,
    Borrar(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login {
        usuario: String,
        password: Option<String>,
    },
    Logout,
    Cuentas,
    Buscar(String),
    Filtro(String),
    Pagina(usize),
    Siguiente,
    Anterior,
    Alta,
    Editar(String),
    Borrar(String),
    Pago {
        cuenta: i64,
        monto: Decimal,
        metodo: MetodoPago,
        descuento: Option<i64>,
    },
    Asignar {
        cuenta: i64,
        cobrador: Option<i64>,
    },
    Corte {
        desde: NaiveDate,
        hasta: NaiveDate,
    },
    Estado(i64),
    Descuentos(Accion),
    Cargos {
        cuenta: i64,
        accion: Accion,
    },
    Ayuda,
    Salir,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Escribe un comando; \"ayuda\" muestra la lista")]
    Empty,
    #[error("Comando desconocido: {0}")]
    Unknown(String),
    #[error("Falta {argument} para {command}")]
    Missing {
        command: &'static str,
        argument: &'static str,
    },
    #[error("Valor inválido para {argument}: {value}")]
    Invalid {
        argument: &'static str,
        value: String,
    },
}

fn required<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, ParseError> {
    args.next().ok_or(ParseError::Missing { command, argument })
}

fn parsed<T: FromStr>(value: &str, argument: &'static str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::Invalid {
        argument,
        value: value.to_string(),
    })
}

fn date(value: &str, argument: &'static str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ParseError::Invalid {
        argument,
        value: value.to_string(),
    })
}

fn accion<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<Accion, ParseError> {
    match args.next().map(str::to_lowercase).as_deref() {
        None => Ok(Accion::Listar),
        Some("nuevo") => Ok(Accion::Nuevo),
        Some("borrar") => Ok(Accion::Borrar(required(args, command, "el id")?.to_string())),
        Some(other) => Err(ParseError::Invalid {
            argument: "la acción",
            value: other.to_string(),
        }),
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        let command = match name.to_lowercase().as_str() {
            "" => return Err(ParseError::Empty),
            "login" => Command::Login {
                usuario: required(&mut args, "login", "el usuario")?.to_string(),
                password: args.next().map(str::to_string),
            },
            "logout" => Command::Logout,
            "cuentas" => Command::Cuentas,
            "buscar" => Command::Buscar(rest.to_string()),
            "filtro" => Command::Filtro(required(&mut args, "filtro", "el filtro")?.to_lowercase()),
            "pagina" | "página" => {
                Command::Pagina(parsed(required(&mut args, "pagina", "el número")?, "página")?)
            }
            "siguiente" => Command::Siguiente,
            "anterior" => Command::Anterior,
            "alta" => Command::Alta,
            "editar" => Command::Editar(required(&mut args, "editar", "el id")?.to_string()),
            "borrar" => Command::Borrar(required(&mut args, "borrar", "el id")?.to_string()),
            "pago" => {
                let cuenta = parsed(required(&mut args, "pago", "la cuenta")?, "cuenta")?;
                let monto = parsed(required(&mut args, "pago", "el monto")?, "monto")?;
                let mut metodo = MetodoPago::default();
                let mut descuento = None;
                if let Some(raw) = args.next() {
                    if let Ok(id) = raw.parse::<i64>() {
                        descuento = Some(id);
                    } else {
                        metodo = MetodoPago::parse(&raw.to_lowercase()).ok_or(ParseError::Invalid {
                            argument: "método",
                            value: raw.to_string(),
                        })?;
                        if let Some(raw) = args.next() {
                            descuento = Some(parsed(raw, "descuento")?);
                        }
                    }
                }
                Command::Pago {
                    cuenta,
                    monto,
                    metodo,
                    descuento,
                }
            }
            "asignar" => {
                let cuenta = parsed(required(&mut args, "asignar", "la cuenta")?, "cuenta")?;
                let cobrador = match required(&mut args, "asignar", "el cobrador")? {
                    "ninguno" => None,
                    raw => Some(parsed(raw, "cobrador")?),
                };
                Command::Asignar { cuenta, cobrador }
            }
            "corte" => Command::Corte {
                desde: date(required(&mut args, "corte", "la fecha inicial")?, "desde")?,
                hasta: date(required(&mut args, "corte", "la fecha final")?, "hasta")?,
            },
            "estado" => Command::Estado(parsed(required(&mut args, "estado", "la cuenta")?, "cuenta")?),
            "descuentos" => Command::Descuentos(accion(&mut args, "descuentos")?),
            "cargos" => Command::Cargos {
                cuenta: parsed(required(&mut args, "cargos", "la cuenta")?, "cuenta")?,
                accion: accion(&mut args, "cargos")?,
            },
            "ayuda" | "help" | "?" => Command::Ayuda,
            "salir" | "exit" | "quit" => Command::Salir,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}
