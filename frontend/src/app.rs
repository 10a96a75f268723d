//! Routes a parsed command to its page or action and prints the result.

use anyhow::Context;
use serde::Serialize;
use tea_factory_core::finance::{self, LoanForm, PaymentForm};
use tea_factory_core::ids::parse_record_id;
use tea_factory_core::{
    registry, Config, FinanceStore, HttpBackend, LedgerSnapshot, RegistryStore, Subscription,
};

use crate::cli::{
    check_status, AdvanceArgs, Cli, Command, DriverCommand, LoanArgs, PaymentCommand,
    SupplierCommand,
};
use crate::format::format_money;
use crate::screens::{
    render_outcome, render_report, CalculationsView, DriversView, FinancesView, InventoryView,
    OverviewView, SuppliersView, TrackingView,
};

fn page<T: Serialize>(view: &T, text: String, json: bool) -> anyhow::Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(view)? + "\n")
    } else {
        Ok(text)
    }
}

pub async fn run(cli: &Cli, config: &Config, backend: &HttpBackend) -> anyhow::Result<()> {
    match &cli.command {
        Command::Track { limit } => track(config, backend, *limit).await,
        command => {
            let out = execute(command, cli.json, config, backend).await?;
            print!("{}", out);
            Ok(())
        }
    }
}

/// Everything but live tracking, against any store.
pub async fn execute<S>(
    command: &Command,
    json: bool,
    config: &Config,
    store: &S,
) -> anyhow::Result<String>
where
    S: FinanceStore + RegistryStore,
{
    match command {
        Command::Overview => {
            let view = OverviewView::load(store, config).await;
            page(&view, view.render(), json)
        }
        Command::Calculations { month, search } => {
            let view = CalculationsView::load(store, month.clone(), search.clone()).await;
            page(&view, view.render(), json)
        }
        Command::Reconcile { supplier } => {
            let mut view = CalculationsView::load_for_reconcile(store).await?;
            match supplier {
                Some(id) => {
                    let outcome = view.reconcile_supplier(store, config, id).await?;
                    page(&outcome, render_outcome(&outcome) + "\n", json)
                }
                None => {
                    let report = view.reconcile_all(store, config).await;
                    page(&report, render_report(&report), json)
                }
            }
        }
        Command::Finances { tab, search } => {
            let view = FinancesView::load(store, config, *tab, search.clone()).await;
            page(&view, view.render(), json)
        }
        Command::Advance(args) => advance(store, args).await,
        Command::Loan(args) => loan(store, args).await,
        Command::Payment(PaymentCommand::Create {
            supplier,
            tea,
            advance,
            loan,
            transport,
            date,
        }) => {
            let mut snapshot = LedgerSnapshot::load(store).await?;
            let form = PaymentForm {
                supplier_id: supplier.clone(),
                loan_amount: *loan,
                advance_amount: *advance,
                tea_amount: *tea,
                transport_charge: transport.unwrap_or(config.transport_charge),
                date: date
                    .clone()
                    .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string()),
                status: String::new(),
            };
            finance::create_payment(store, &mut snapshot, &form).await?;
            Ok(format!(
                "Payment recorded for {}: net {}\n",
                supplier,
                format_money(form.net_amount())
            ))
        }
        Command::Payment(PaymentCommand::Show { id }) => {
            let id = parse_record_id(id)?;
            match finance::get_payment(store, id).await? {
                Some(p) => page(
                    &p,
                    format!(
                        "Payment #{} {} ({})\n  tea {}\n  advance {}\n  loan {}\n  transport {}\n  net {}\n  {} {}\n",
                        p.id,
                        p.supplier_name,
                        p.supplier_id,
                        format_money(p.tea_amount),
                        format_money(p.advance_amount),
                        format_money(p.loan_amount),
                        format_money(p.transport_charge),
                        format_money(p.net_amount),
                        p.date,
                        p.status
                    ),
                    json,
                ),
                None => Ok(format!("Payment #{} not found.\n", id)),
            }
        }
        Command::Status { ledger, id, status } => {
            let status = check_status(*ledger, status)?;
            let id = parse_record_id(id)?;
            let mut snapshot = LedgerSnapshot::default();
            finance::set_status(store, &mut snapshot, (*ledger).into(), id, status).await?;
            Ok(format!("{:?} #{} set to {}\n", ledger, id, status))
        }
        Command::Delete { ledger, id } => {
            let id = parse_record_id(id)?;
            let mut snapshot = LedgerSnapshot::default();
            finance::delete_record(store, &mut snapshot, (*ledger).into(), id).await?;
            Ok(format!("{:?} #{} deleted\n", ledger, id))
        }
        Command::Inventory { search } => {
            let view = InventoryView::load(store, search.clone()).await;
            page(&view, view.render(), json)
        }
        Command::Suppliers(SupplierCommand::List { search }) => {
            let view = SuppliersView::load(store, search.clone()).await;
            page(&view, view.render(), json)
        }
        Command::Suppliers(SupplierCommand::Add(args)) => {
            let existing = store.list_suppliers().await.context("loading suppliers")?;
            registry::add_supplier(store, &args.into(), &existing).await?;
            Ok(format!("Supplier {} added\n", args.id.trim()))
        }
        Command::Suppliers(SupplierCommand::Delete { id }) => {
            registry::delete_supplier(store, id).await?;
            Ok(format!("Supplier {} deleted\n", id.trim()))
        }
        Command::Drivers(DriverCommand::List { search }) => {
            let view = DriversView::load(store, search.clone()).await;
            page(&view, view.render(), json)
        }
        Command::Drivers(DriverCommand::Add(args)) => {
            let existing = store.list_drivers().await.context("loading drivers")?;
            registry::add_driver(store, &args.into(), &existing).await?;
            Ok(format!("Driver {} added\n", args.id.trim()))
        }
        Command::Track { .. } => Err(anyhow::anyhow!("tracking needs a live backend connection")),
    }
}

async fn advance<S: FinanceStore>(store: &S, args: &AdvanceArgs) -> anyhow::Result<String> {
    let mut snapshot = LedgerSnapshot::load(store).await?;
    if args.all {
        let report =
            finance::create_advance_for_all(store, &mut snapshot, args.amount, &args.month).await?;
        let mut out = format!(
            "Advances of {} for {}: {} created\n",
            format_money(args.amount),
            args.month,
            report.created
        );
        for (supplier, error) in &report.failed {
            out.push_str(&format!("  {} failed: {}\n", supplier, error));
        }
        return Ok(out);
    }
    let supplier = args.supplier.as_deref().unwrap_or_default();
    finance::create_advance(store, &mut snapshot, supplier, args.amount, &args.month).await?;
    Ok(format!(
        "Advance of {} recorded for {} ({})\n",
        format_money(args.amount),
        supplier,
        args.month
    ))
}

async fn loan<S: FinanceStore>(store: &S, args: &LoanArgs) -> anyhow::Result<String> {
    let mut snapshot = LedgerSnapshot::load(store).await?;
    let monthly = args
        .monthly
        .unwrap_or_else(|| if args.months == 0 { 0.0 } else { args.amount / args.months as f64 });
    let form = LoanForm {
        supplier_id: args.supplier.clone(),
        amount: args.amount,
        duration_months: args.months,
        purpose: args.purpose.clone(),
        monthly_amount: monthly,
        due_date: args.due.clone(),
        status: String::new(),
    };
    finance::create_loan(store, &mut snapshot, &form).await?;
    Ok(format!(
        "Loan of {} recorded for {} over {} months\n",
        format_money(args.amount),
        args.supplier,
        args.months
    ))
}

/// Print the board, then one line per location update until ctrl-c or `limit` updates.
async fn track(config: &Config, backend: &HttpBackend, limit: Option<usize>) -> anyhow::Result<()> {
    let mut view = TrackingView::load(backend).await;
    print!("{}", view.render());

    let mut subscription = Subscription::connect(backend, config).await?;
    tracing::info!("following {}", config.driver_channel);
    let mut seen = 0usize;
    loop {
        tokio::select! {
            update = subscription.next() => match update {
                Some(update) => {
                    if let Some(line) = view.apply(&update) {
                        println!("{}", line);
                    }
                    seen += 1;
                    if limit.is_some_and(|l| seen >= l) {
                        break;
                    }
                }
                None => {
                    tracing::warn!("location channel closed");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    drop(subscription);
    print!("\n{}", view.render());
    Ok(())
}
