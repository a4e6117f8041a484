//! Interactive console loop.

use std::io::Write;
use std::sync::{Arc, Mutex};

use agua_lib::error::FieldValidationError;
use agua_lib::model::{Cargo, Cobrador, Cuentahabiente, Descuento, Pago, Tarifa};
use agua_lib::session::SessionState;
use agua_lib::{AguaClient, ErrorKind};
use agua_views::form::{
    ClickTarget, Field, FieldKind, FieldRow, FormData, SelectOption, SubmitOutcome, validators,
};
use agua_views::table::DEFAULT_PER_PAGE;
use agua_views::{BoxError, Column, DataTable, FilterOption, Form};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::commands::{
    Accion, Command, HELP, ParseError, render_corte, render_dropdown, render_estado, render_table,
};
use crate::error::ConsoleError;
use crate::settings::SettingsProvider;

/// Setting holding the last selected account filter.
const FILTRO_KEY: &str = "cuentas/filtro";

/// Typed at any capture prompt to abandon the form.
const CANCELAR: &str = "cancelar";

/// Optional account fields sent as `null` when left blank.
const OPCIONALES: [&str; 3] = ["colonia", "telefono", "email"];

/// Whether a capture should go on.
enum Flow {
    Continue,
    Cancel,
}

/// Search-select queries of a form and the collectors they are matched against.
struct Busqueda {
    rx: mpsc::UnboundedReceiver<String>,
    cobradores: Vec<Cobrador>,
}

pub struct Console {
    client: AguaClient,
    settings: SettingsProvider,
    cuentas: DataTable<Cuentahabiente>,
    /// Row handed over by the table's edit action.
    editing: Arc<Mutex<Option<Cuentahabiente>>>,
    descuentos: DataTable<Descuento>,
    cargos: DataTable<Cargo>,
    /// Account whose charges `cargos` lists.
    cargos_de: Arc<Mutex<Option<i64>>>,
    refresh: u64,
    input: Lines<BufReader<Stdin>>,
    shutdown: CancellationToken,
}

impl Console {
    pub async fn new(client: AguaClient, settings: SettingsProvider) -> Result<Self, ConsoleError> {
        let editing = Arc::new(Mutex::new(None));
        let cuentas = cuentas_table(&client, Arc::clone(&editing));
        let cargos_de = Arc::new(Mutex::new(None));
        let cargos = cargos_table(&client, Arc::clone(&cargos_de));
        let descuentos = descuentos_table(&client);

        let filtro: String = settings.get_or(FILTRO_KEY, String::new()).await?;
        if !filtro.is_empty() && !cuentas.select_filter(&filtro) {
            log::warn!("Stored filter {:?} no longer exists", filtro);
        }

        Ok(Self {
            client,
            settings,
            cuentas,
            editing,
            descuentos,
            cargos,
            cargos_de,
            refresh: 0,
            input: BufReader::new(tokio::io::stdin()).lines(),
            shutdown: CancellationToken::new(),
        })
    }

    pub async fn run(mut self) -> Result<(), ConsoleError> {
        self.watch_session();
        println!("Agua - consola de cobranza ({})", self.client.base_url());
        println!("Escribe \"ayuda\" para ver los comandos.");

        if self.client.session().is_authenticated() {
            if let Some(usuario) = self.client.session().usuario() {
                println!("Sesión activa: {}", usuario.nombre);
            }
            self.cuentas.mount().await;
            self.show();
        }

        while let Some(line) = self.ask("agua> ").await? {
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(ParseError::Empty) => continue,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            };
            if command == Command::Salir {
                break;
            }
            if let Err(e) = self.execute(command).await {
                report(&e);
            }
        }

        self.shutdown.cancel();
        self.cuentas.unmount();
        self.descuentos.unmount();
        self.cargos.unmount();
        Ok(())
    }

    async fn execute(&mut self, command: Command) -> Result<(), ConsoleError> {
        let public = matches!(command, Command::Login { .. } | Command::Ayuda);
        if !public && !self.client.session().is_authenticated() {
            println!("Inicia sesión primero: login <usuario>");
            return Ok(());
        }

        match command {
            Command::Login { usuario, password } => {
                let password = match password {
                    Some(password) => password,
                    None => self.ask("Contraseña: ").await?.unwrap_or_default(),
                };
                let usuario = self.client.login(&usuario, &password).await?;
                match usuario {
                    Some(usuario) => println!("Bienvenido, {}", usuario.nombre),
                    None => println!("Sesión iniciada"),
                }
                self.cuentas.mount().await;
                self.show();
            }
            Command::Logout => {
                self.cuentas.unmount();
                self.descuentos.unmount();
                self.cargos.unmount();
                self.client.logout().await?;
                println!("Sesión cerrada");
            }
            Command::Cuentas => {
                if self.cuentas.is_mounted() {
                    self.cuentas.load().await;
                } else {
                    self.cuentas.mount().await;
                }
                self.show();
            }
            Command::Buscar(texto) => {
                self.cuentas.set_search(texto);
                self.show();
            }
            Command::Filtro(id) => {
                if self.cuentas.select_filter(&id) {
                    self.settings.set(FILTRO_KEY, &id).await?;
                    self.show();
                } else {
                    let opciones: Vec<String> = self
                        .cuentas
                        .view()
                        .filters
                        .into_iter()
                        .map(|(id, label)| format!("{} ({})", id, label))
                        .collect();
                    println!("Filtro desconocido. Opciones: {}", opciones.join(", "));
                }
            }
            Command::Pagina(page) => self.paginate(self.cuentas.go_to_page(page)),
            Command::Siguiente => self.paginate(self.cuentas.next_page()),
            Command::Anterior => self.paginate(self.cuentas.prev_page()),
            Command::Alta => self.capturar_cuenta(None).await?,
            Command::Editar(id) => {
                let Some(row) = self.cuentas.find(&id) else {
                    println!("No hay un cuentahabiente {} en la lista", id);
                    return Ok(());
                };
                self.cuentas.edit(&row);
                let row = self.editing.lock().ok().and_then(|mut slot| slot.take());
                if let Some(row) = row {
                    self.capturar_cuenta(Some(row)).await?;
                }
            }
            Command::Borrar(id) => {
                let cuentas = self.cuentas.clone();
                let borrado = self
                    .borrar(&cuentas, &id, |c| format!("a {} ({})", c.nombre, c.numero_cuenta))
                    .await?;
                if borrado {
                    println!("Cuentahabiente eliminado");
                    self.show();
                }
            }
            Command::Pago {
                cuenta,
                monto,
                metodo,
                descuento,
            } => {
                if let Some(id) = descuento {
                    let descuento = self.client.retrieve::<Descuento>(id).await?;
                    if !descuento.activo {
                        println!("El descuento {} no está activo", descuento.nombre);
                        return Ok(());
                    }
                    println!(
                        "Descuento {}: -{}, neto a cobrar {}",
                        descuento.nombre,
                        descuento.importe(monto),
                        descuento.aplicar(monto)
                    );
                }
                let pago = Pago {
                    id: None,
                    cuentahabiente_id: cuenta,
                    cobrador_id: None,
                    fecha: chrono::Local::now().date_naive(),
                    monto,
                    metodo,
                    descuento_id: descuento,
                    folio: None,
                };
                let pago = self.client.registrar_pago(&pago).await?;
                match &pago.folio {
                    Some(folio) => println!("Pago registrado, folio {}", folio),
                    None => println!("Pago registrado"),
                }
                self.refresh().await;
            }
            Command::Asignar { cuenta, cobrador } => {
                let cuenta = self.client.asignar_cobrador(cuenta, cobrador).await?;
                match &cuenta.cobrador {
                    Some(cobrador) => println!("{} asignado a {}", cobrador.nombre, cuenta.nombre),
                    None => println!("{} quedó sin cobrador", cuenta.nombre),
                }
                self.refresh().await;
            }
            Command::Corte { desde, hasta } => {
                let corte = self.client.corte_caja(desde, hasta).await?;
                println!("{}", render_corte(&corte));
            }
            Command::Estado(cuenta) => {
                let estado = self.client.estado_cuenta(cuenta).await?;
                println!("{}", render_estado(&estado));
            }
            Command::Descuentos(accion) => self.descuentos(accion).await?,
            Command::Cargos { cuenta, accion } => self.cargos(cuenta, accion).await?,
            Command::Ayuda => println!("{}", HELP),
            Command::Salir => {}
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Table
    // -------------------------------------------------------------------------

    fn show(&self) {
        println!("{}", render_table(&self.cuentas.view()));
    }

    fn paginate(&self, moved: bool) {
        if moved {
            self.show();
        } else {
            println!("No hay más páginas en esa dirección");
        }
    }

    /// Bumps the table's refresh token after a change made elsewhere.
    async fn refresh(&mut self) {
        if !self.cuentas.is_mounted() {
            return;
        }
        self.refresh += 1;
        self.cuentas.set_refresh_token(self.refresh).await;
    }

    // -------------------------------------------------------------------------
    // Account capture
    // -------------------------------------------------------------------------

    /// Walks the operator through the account form, creating or updating.
    async fn capturar_cuenta(&mut self, existing: Option<Cuentahabiente>) -> Result<(), ConsoleError> {
        let cobradores: Vec<Cobrador> = self
            .client
            .list::<Cobrador>()
            .await?
            .into_iter()
            .filter(|c| c.activo)
            .collect();
        let (search_tx, rx) = mpsc::unbounded_channel();

        let client = self.client.clone();
        let id = existing.as_ref().and_then(|c| c.id);
        let activo = existing.as_ref().is_none_or(|c| c.activo);
        let form = Form::builder(cuenta_fields(existing.as_ref(), search_tx))
            .on_submit(move |data| {
                let client = client.clone();
                async move {
                    guardar_cuenta(&client, id, activo, data)
                        .await
                        .map(|_| ())
                        .map_err(BoxError::from)
                }
            })
            .on_reset(|| println!("Captura cancelada"))
            .build();

        let titulo = if id.is_some() { "Editar cuentahabiente" } else { "Alta de cuentahabiente" };
        let mut busqueda = Busqueda { rx, cobradores };
        if self.capturar(&form, titulo, Some(&mut busqueda)).await? {
            println!("Cuentahabiente guardado");
            self.refresh().await;
        }
        Ok(())
    }

    /// Prompts for every field in layout order, re-asking the invalid ones,
    /// until the form is saved or the operator gives up. Returns whether the
    /// form was saved.
    async fn capturar(
        &mut self,
        form: &Form,
        titulo: &str,
        mut busqueda: Option<&mut Busqueda>,
    ) -> Result<bool, ConsoleError> {
        form.mount();
        println!("{} (escribe \"{}\" para salir)", titulo, CANCELAR);
        let mut pendientes: Vec<String> = form
            .layout()
            .into_iter()
            .flat_map(|row| match row {
                FieldRow::Pair(a, b) => vec![a, b],
                FieldRow::Full(name) | FieldRow::Single(name) => vec![name],
            })
            .collect();

        let guardado = loop {
            for name in &pendientes {
                let flow = self
                    .capturar_campo(form, name, busqueda.as_deref_mut())
                    .await?;
                if let Flow::Cancel = flow {
                    form.reset();
                    form.unmount();
                    return Ok(false);
                }
            }

            match form.submit().await {
                SubmitOutcome::Submitted => break true,
                SubmitOutcome::Invalid(errors) => {
                    for (_, message) in errors.iter() {
                        println!("  - {}", message);
                    }
                    pendientes = errors.iter().map(|(name, _)| name.clone()).collect();
                }
                SubmitOutcome::Failed(message) => {
                    println!("No se pudo guardar: {}", message);
                    let reintentar = self
                        .ask("¿Corregir y reintentar? [S/n] ")
                        .await?
                        .is_none_or(|r| !r.trim().eq_ignore_ascii_case("n"));
                    if !reintentar {
                        form.reset();
                        break false;
                    }
                }
                SubmitOutcome::Busy => {}
            }
        };

        form.unmount();
        Ok(guardado)
    }

    async fn capturar_campo(
        &mut self,
        form: &Form,
        name: &str,
        busqueda: Option<&mut Busqueda>,
    ) -> Result<Flow, ConsoleError> {
        let Some(field) = form.field(name) else {
            return Ok(Flow::Continue);
        };
        let actual = form.value(name).map(|v| v.to_string()).unwrap_or_default();
        if field.disabled {
            println!("{}: {} (no editable)", field.label, actual);
            return Ok(Flow::Continue);
        }
        let marca = if field.required { "*" } else { "" };

        match &field.kind {
            FieldKind::Select { options } => {
                for (i, option) in options.iter().enumerate() {
                    println!("  {}) {}", i + 1, option.label);
                }
                let Some(answer) = self.ask(&format!("{}{} [{}]: ", field.label, marca, actual)).await? else {
                    return Ok(Flow::Cancel);
                };
                let answer = answer.trim();
                if answer == CANCELAR {
                    return Ok(Flow::Cancel);
                }
                if let Some(option) = pick(options, answer) {
                    form.set_value(name, option.value.as_str())?;
                }
            }
            FieldKind::SearchSelect { .. } => {
                let shown = form.search_text(name);
                let Some(answer) = self.ask(&format!("Buscar {}{} [{}]: ", field.label.to_lowercase(), marca, shown)).await? else {
                    return Ok(Flow::Cancel);
                };
                let answer = answer.trim();
                if answer == CANCELAR {
                    return Ok(Flow::Cancel);
                }
                if answer.is_empty() {
                    return Ok(Flow::Continue);
                }

                form.type_search(name, answer)?;
                if let Some(busqueda) = busqueda {
                    while let Ok(query) = busqueda.rx.try_recv() {
                        form.set_options(name, opciones_cobrador(&busqueda.cobradores, &query))?;
                    }
                }
                let dropdown = form.dropdown(name);
                println!("{}", render_dropdown(&dropdown));
                let choice = self.ask("Elige un número (Enter para omitir): ").await?;
                let picked = choice
                    .as_deref()
                    .and_then(|c| c.trim().parse::<usize>().ok())
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| dropdown.get(i));
                match picked {
                    Some(option) => {
                        form.select_option(name, &option.value)?;
                    }
                    None => form.click(ClickTarget::Outside),
                }
            }
            FieldKind::Text(_) | FieldKind::TextArea { .. } | FieldKind::Password => {
                let Some(answer) = self.ask(&format!("{}{} [{}]: ", field.label, marca, actual)).await? else {
                    return Ok(Flow::Cancel);
                };
                if answer.trim() == CANCELAR {
                    return Ok(Flow::Cancel);
                }
                if !answer.trim().is_empty() {
                    form.set_value(name, answer.trim())?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    // -------------------------------------------------------------------------
    // Discounts & charges
    // -------------------------------------------------------------------------

    async fn descuentos(&mut self, accion: Accion) -> Result<(), ConsoleError> {
        match accion {
            Accion::Listar => {
                self.descuentos.mount().await;
                println!("{}", render_table(&self.descuentos.view()));
            }
            Accion::Nuevo => {
                let client = self.client.clone();
                let form = Form::builder(descuento_fields())
                    .on_submit(move |data| {
                        let client = client.clone();
                        async move {
                            let descuento = descuento_de(&data)?;
                            client
                                .guardar_descuento(&descuento)
                                .await
                                .map(|_| ())
                                .map_err(BoxError::from)
                        }
                    })
                    .on_reset(|| println!("Captura cancelada"))
                    .build();
                if self.capturar(&form, "Nuevo descuento", None).await? {
                    println!("Descuento guardado");
                    if self.descuentos.is_mounted() {
                        self.descuentos.load().await;
                    }
                }
            }
            Accion::Borrar(id) => {
                if !self.descuentos.is_mounted() {
                    self.descuentos.mount().await;
                }
                let descuentos = self.descuentos.clone();
                if self
                    .borrar(&descuentos, &id, |d| format!("el descuento {}", d.nombre))
                    .await?
                {
                    println!("Descuento eliminado");
                }
            }
        }
        Ok(())
    }

    async fn cargos(&mut self, cuenta: i64, accion: Accion) -> Result<(), ConsoleError> {
        let otra_cuenta = self
            .cargos_de
            .lock()
            .map(|mut slot| slot.replace(cuenta) != Some(cuenta))
            .unwrap_or(true);
        if otra_cuenta {
            self.cargos.set_search("");
        }
        if !self.cargos.is_mounted() {
            self.cargos.mount().await;
        } else if otra_cuenta || accion == Accion::Listar {
            self.cargos.load().await;
        }

        match accion {
            Accion::Listar => {
                println!("Cargos de la cuenta {}", cuenta);
                println!("{}", render_table(&self.cargos.view()));
            }
            Accion::Nuevo => {
                let client = self.client.clone();
                let form = Form::builder(cargo_fields())
                    .on_submit(move |data| {
                        let client = client.clone();
                        async move {
                            let cargo = cargo_de(cuenta, &data)?;
                            client
                                .registrar_cargo(&cargo)
                                .await
                                .map(|_| ())
                                .map_err(BoxError::from)
                        }
                    })
                    .on_reset(|| println!("Captura cancelada"))
                    .build();
                if self.capturar(&form, "Nuevo cargo", None).await? {
                    println!("Cargo registrado");
                    self.cargos.load().await;
                }
            }
            Accion::Borrar(id) => {
                let cargos = self.cargos.clone();
                if self
                    .borrar(&cargos, &id, |c| format!("el cargo {} ({})", c.concepto, c.monto))
                    .await?
                {
                    println!("Cargo eliminado");
                }
            }
        }
        Ok(())
    }

    /// Asks for confirmation, then runs the table's delete action on row `id`.
    /// Returns whether the row was deleted.
    async fn borrar<T>(
        &mut self,
        table: &DataTable<T>,
        id: &str,
        describir: impl Fn(&T) -> String,
    ) -> Result<bool, ConsoleError>
    where
        T: Serialize + Clone + Send + Sync + 'static,
    {
        let Some(row) = table.find(id) else {
            println!("No hay un registro {} en la lista", id);
            return Ok(false);
        };
        let pregunta = format!("¿Eliminar {}? [s/N] ", describir(&row));
        let confirmado = self
            .ask(&pregunta)
            .await?
            .is_some_and(|r| r.trim().eq_ignore_ascii_case("s"));
        if !confirmado {
            println!("Sin cambios");
            return Ok(false);
        }
        if table.delete(row).await {
            Ok(true)
        } else {
            println!("No se pudo eliminar; revisa el log para más detalle");
            Ok(false)
        }
    }

    // -------------------------------------------------------------------------
    // Terminal I/O
    // -------------------------------------------------------------------------

    /// Prints `prompt` and reads one line. `None` at end of input.
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>, ConsoleError> {
        print!("{}", prompt);
        std::io::stdout().flush()?;
        Ok(self.input.next_line().await?)
    }

    /// Tells the operator when the backend drops the session.
    fn watch_session(&self) {
        let mut state = self.client.session().subscribe();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    changed = state.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        if *state.borrow_and_update() == SessionState::Expired {
                            log::warn!("Session expired");
                            println!("\nLa sesión expiró. Inicia sesión de nuevo: login <usuario>");
                        }
                    }
                }
            }
        });
    }
}

fn report(error: &ConsoleError) {
    match error {
        ConsoleError::Api(agua_lib::Error::InvalidCredentials) => {
            println!("Usuario o contraseña incorrectos")
        }
        ConsoleError::Api(e) => match e.kind() {
            ErrorKind::Unauthorized => println!("Sesión inválida o expirada; usa login"),
            ErrorKind::Validation => {
                println!("El servidor rechazó los datos:");
                for field in e.field_errors() {
                    println!("  - {}: {}", field.field, field.message);
                }
            }
            ErrorKind::Network => println!("Sin conexión con el servidor: {}", e),
            _ => println!("Error: {}", e),
        },
        other => println!("Error: {}", other),
    }
}

/// Matches a select answer by 1-based position or by value.
fn pick<'a>(options: &'a [SelectOption], answer: &str) -> Option<&'a SelectOption> {
    answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| options.get(i))
        .or_else(|| options.iter().find(|o| o.value.eq_ignore_ascii_case(answer)))
}

fn opciones_cobrador(cobradores: &[Cobrador], query: &str) -> Vec<SelectOption> {
    let query = query.to_lowercase();
    cobradores
        .iter()
        .filter(|c| c.nombre.to_lowercase().contains(&query))
        .filter_map(|c| c.id.map(|id| SelectOption::new(id.to_string(), c.nombre.clone())))
        .collect()
}

fn cuentas_table(
    client: &AguaClient,
    editing: Arc<Mutex<Option<Cuentahabiente>>>,
) -> DataTable<Cuentahabiente> {
    let columns = vec![
        Column::new("numero_cuenta", "Cuenta"),
        Column::new("nombre", "Nombre"),
        Column::new("direccion", "Dirección"),
        Column::new("colonia", "Colonia"),
        Column::new("tarifa", "Tarifa").render(|_, c: &Cuentahabiente| c.tarifa.label().to_string()),
        Column::new("cobrador.nombre", "Cobrador"),
        Column::new("activo", "Estado")
            .render(|_, c: &Cuentahabiente| if c.activo { "Activo" } else { "Baja" }.to_string()),
    ];

    let mut filters = vec![
        FilterOption::new("activos", "Activos").predicate(|c: &Cuentahabiente| c.activo),
        FilterOption::new("bajas", "Bajas").predicate(|c: &Cuentahabiente| !c.activo),
    ];
    filters.extend(Tarifa::ALL.into_iter().map(|tarifa| {
        FilterOption::new(tarifa.as_str(), tarifa.label())
            .value(tarifa.as_str())
            .predicate(move |c: &Cuentahabiente| c.tarifa == tarifa)
    }));

    let fetch_client = client.clone();
    let delete_client = client.clone();
    DataTable::builder(columns, move |cancel| {
        let client = fetch_client.clone();
        async move {
            client
                .list_cancellable::<Cuentahabiente>(&cancel)
                .await
                .map_err(BoxError::from)
        }
    })
    .searchable(["numero_cuenta", "nombre", "direccion", "colonia", "cobrador.nombre"])
    .filters(filters)
    .per_page(DEFAULT_PER_PAGE)
    .row_id(|c: &Cuentahabiente| c.id.map(|id| id.to_string()).unwrap_or_default())
    .on_edit(move |c: &Cuentahabiente| {
        if let Ok(mut slot) = editing.lock() {
            *slot = Some(c.clone());
        }
    })
    .on_delete(move |c: Cuentahabiente| {
        let client = delete_client.clone();
        async move {
            let Some(id) = c.id else {
                return Ok(false);
            };
            match client.delete::<Cuentahabiente>(id).await {
                Ok(()) => Ok(true),
                Err(e) => Err(BoxError::from(e)),
            }
        }
    })
    .build()
}

fn cuenta_fields(
    existing: Option<&Cuentahabiente>,
    search_tx: mpsc::UnboundedSender<String>,
) -> Vec<Field> {
    let text = |value: Option<&str>| value.unwrap_or_default().to_string();

    let mut numero = Field::new("numero_cuenta", "Número de cuenta", FieldKind::text())
        .required()
        .default_value(text(existing.map(|c| c.numero_cuenta.as_str())));
    if existing.is_some() {
        numero = numero.disabled();
    }

    let telefono = Field::new("telefono", "Teléfono", FieldKind::tel())
        .default_value(text(existing.and_then(|c| c.telefono.as_deref())));
    let telefono = match validators::pattern(r"\d{10}", "El teléfono debe tener 10 dígitos") {
        Ok(rule) => telefono.rule(rule),
        Err(e) => {
            log::error!("Invalid phone pattern: {}", e);
            telefono
        }
    };

    let tarifas = Tarifa::ALL
        .iter()
        .map(|t| SelectOption::new(t.as_str(), t.label()))
        .collect();
    let cobrador_id = existing
        .and_then(|c| c.cobrador.as_ref())
        .and_then(|c| c.id)
        .map(|id| id.to_string())
        .unwrap_or_default();

    vec![
        numero,
        Field::new("nombre", "Nombre", FieldKind::text())
            .required()
            .rule(validators::min_length(3, "El nombre es muy corto"))
            .default_value(text(existing.map(|c| c.nombre.as_str()))),
        Field::new("direccion", "Dirección", FieldKind::text())
            .required()
            .full_width()
            .default_value(text(existing.map(|c| c.direccion.as_str()))),
        Field::new("colonia", "Colonia", FieldKind::text())
            .default_value(text(existing.and_then(|c| c.colonia.as_deref()))),
        telefono,
        Field::new("email", "Email", FieldKind::email())
            .rule(validators::email("El email no es válido"))
            .default_value(text(existing.and_then(|c| c.email.as_deref()))),
        Field::new("tarifa", "Tarifa", FieldKind::select(tarifas))
            .required()
            .default_value(existing.map(|c| c.tarifa).unwrap_or_default().as_str()),
        Field::new(
            "cobrador_id",
            "Cobrador",
            FieldKind::search_select(move |query| {
                let _ = search_tx.send(query);
            }),
        )
        .default_value(cobrador_id),
    ]
}

/// Creates or updates the account described by `data`, then assigns its
/// collector when one was picked.
async fn guardar_cuenta(
    client: &AguaClient,
    id: Option<i64>,
    activo: bool,
    data: FormData,
) -> Result<Cuentahabiente, agua_lib::Error> {
    let mut json = data.to_json();
    let mut cobrador_id = None;
    if let Some(fields) = json.as_object_mut() {
        for key in OPCIONALES {
            let blank = fields
                .get(key)
                .and_then(|v| v.as_str())
                .is_some_and(|s| s.trim().is_empty());
            if blank {
                fields.insert(key.to_string(), serde_json::Value::Null);
            }
        }
        cobrador_id = fields
            .remove("cobrador_id")
            .and_then(|v| v.as_str().and_then(|s| s.trim().parse::<i64>().ok()));
    }

    let mut cuenta: Cuentahabiente = serde_json::from_value(json)
        .map_err(|e| agua_lib::Error::InvalidRequest(e.to_string()))?;
    cuenta.id = id;
    cuenta.activo = activo;

    let saved = match id {
        Some(_) => client.update(&cuenta).await?,
        None => client.create(&cuenta).await?,
    };
    if let (Some(saved_id), Some(cobrador)) = (saved.id, cobrador_id) {
        return client.asignar_cobrador(saved_id, Some(cobrador)).await;
    }
    Ok(saved)
}

fn descuentos_table(client: &AguaClient) -> DataTable<Descuento> {
    let columns = vec![
        Column::new("nombre", "Nombre"),
        Column::new("porcentaje", "Porcentaje").render(|_, d: &Descuento| format!("{}%", d.porcentaje)),
        Column::new("activo", "Estado")
            .render(|_, d: &Descuento| if d.activo { "Activo" } else { "Inactivo" }.to_string()),
    ];
    let filters = vec![
        FilterOption::new("activos", "Activos").predicate(|d: &Descuento| d.activo),
        FilterOption::new("inactivos", "Inactivos").predicate(|d: &Descuento| !d.activo),
    ];

    let fetch_client = client.clone();
    let delete_client = client.clone();
    DataTable::builder(columns, move |cancel| {
        let client = fetch_client.clone();
        async move {
            client
                .list_cancellable::<Descuento>(&cancel)
                .await
                .map_err(BoxError::from)
        }
    })
    .searchable(["nombre"])
    .filters(filters)
    .per_page(DEFAULT_PER_PAGE)
    .row_id(|d: &Descuento| d.id.map(|id| id.to_string()).unwrap_or_default())
    .on_delete(move |d: Descuento| {
        let client = delete_client.clone();
        async move {
            let Some(id) = d.id else {
                return Ok(false);
            };
            client.delete::<Descuento>(id).await.map(|_| true).map_err(BoxError::from)
        }
    })
    .build()
}

/// Charges of the account held in `cuenta`. Lists nothing until one is set.
fn cargos_table(client: &AguaClient, cuenta: Arc<Mutex<Option<i64>>>) -> DataTable<Cargo> {
    let columns = vec![
        Column::new("fecha", "Fecha"),
        Column::new("concepto", "Concepto"),
        Column::new("monto", "Monto").render(|_, c: &Cargo| c.monto.to_string()),
        Column::new("pagado", "Estado")
            .render(|_, c: &Cargo| if c.pagado { "Pagado" } else { "Pendiente" }.to_string()),
    ];
    let filters = vec![
        FilterOption::new("pendientes", "Pendientes").predicate(|c: &Cargo| !c.pagado),
        FilterOption::new("pagados", "Pagados").predicate(|c: &Cargo| c.pagado),
    ];

    let fetch_client = client.clone();
    let delete_client = client.clone();
    DataTable::builder(columns, move |cancel| {
        let client = fetch_client.clone();
        let cuenta = cuenta.lock().ok().and_then(|slot| *slot);
        async move {
            let Some(id) = cuenta else {
                return Ok(Vec::new());
            };
            client.cargos_de(id, &cancel).await.map_err(BoxError::from)
        }
    })
    .searchable(["concepto", "fecha"])
    .filters(filters)
    .per_page(DEFAULT_PER_PAGE)
    .row_id(|c: &Cargo| c.id.map(|id| id.to_string()).unwrap_or_default())
    .on_delete(move |c: Cargo| {
        let client = delete_client.clone();
        async move {
            let Some(id) = c.id else {
                return Ok(false);
            };
            client.delete::<Cargo>(id).await.map(|_| true).map_err(BoxError::from)
        }
    })
    .build()
}

fn descuento_fields() -> Vec<Field> {
    let estados = vec![SelectOption::new("si", "Sí"), SelectOption::new("no", "No")];
    vec![
        Field::new("nombre", "Nombre", FieldKind::text())
            .required()
            .rule(validators::min_length(3, "El nombre es muy corto")),
        Field::new("porcentaje", "Porcentaje", FieldKind::number())
            .required()
            .validator(|value, _| {
                if value.is_blank() {
                    return None;
                }
                match value.as_number() {
                    Some(n) if n > 0.0 && n <= 100.0 => None,
                    _ => Some("El porcentaje debe estar entre 0 y 100".to_string()),
                }
            }),
        Field::new("activo", "Activo", FieldKind::select(estados)).default_value("si"),
    ]
}

fn cargo_fields() -> Vec<Field> {
    let hoy = chrono::Local::now().date_naive();
    vec![
        Field::new("concepto", "Concepto", FieldKind::text())
            .required()
            .full_width(),
        Field::new("monto", "Monto", FieldKind::number())
            .required()
            .rule(validators::positive_number("El monto debe ser mayor a cero")),
        Field::new("fecha", "Fecha", FieldKind::date())
            .required()
            .default_value(hoy.to_string())
            .validator(|value, _| {
                let text = value.to_string();
                let text = text.trim();
                (!text.is_empty() && text.parse::<NaiveDate>().is_err())
                    .then(|| "La fecha debe tener el formato AAAA-MM-DD".to_string())
            }),
    ]
}

fn decimal(data: &FormData, name: &str, message: &str) -> Result<Decimal, agua_lib::Error> {
    data.text(name)
        .trim()
        .parse::<Decimal>()
        .map_err(|_| agua_lib::Error::Validation(vec![FieldValidationError::new(name, message)]))
}

fn descuento_de(data: &FormData) -> Result<Descuento, agua_lib::Error> {
    Ok(Descuento {
        id: None,
        nombre: data.text("nombre").trim().to_string(),
        porcentaje: decimal(data, "porcentaje", "El porcentaje no es un número")?,
        activo: data.text("activo") != "no",
    })
}

fn cargo_de(cuenta: i64, data: &FormData) -> Result<Cargo, agua_lib::Error> {
    let fecha = data.text("fecha").trim().parse::<NaiveDate>().map_err(|_| {
        agua_lib::Error::Validation(vec![FieldValidationError::new(
            "fecha",
            "La fecha debe tener el formato AAAA-MM-DD",
        )])
    })?;
    Ok(Cargo {
        id: None,
        cuentahabiente_id: cuenta,
        concepto: data.text("concepto").trim().to_string(),
        monto: decimal(data, "monto", "El monto no es un número")?,
        fecha,
        pagado: false,
    })
}
