//! Reminder message rendering (Spanish subject and bodies).

use lomarosa_core::{
  classify::InvoiceStatus,
  record::{Reminder, format_currency},
};

use crate::transport::OutgoingMail;

/// Render one reminder into a ready-to-send email.
pub fn render_reminder(reminder: &Reminder) -> OutgoingMail {
  let subject =
    format!("Recordatorio de Pago - Factura {}", reminder.invoice_number);

  OutgoingMail {
    to: reminder.email.clone(),
    subject,
    text_body: text_body(reminder),
    html_body: html_body(reminder),
  }
}

fn status_line(reminder: &Reminder) -> String {
  match reminder.status {
    InvoiceStatus::Vencido => format!(
      "Su factura se encuentra VENCIDA hace {} día(s).",
      reminder.days_to_due.abs()
    ),
    InvoiceStatus::Proximo => format!(
      "Su factura vence en {} día(s).",
      reminder.days_to_due
    ),
  }
}

fn due_date_line(reminder: &Reminder) -> String {
  match reminder.due_date {
    Some(d) => d.format("%d/%m/%Y").to_string(),
    None => "N/A".to_string(),
  }
}

fn text_body(reminder: &Reminder) -> String {
  format!(
    "Estimado/a {nombre},\n\n\
     Le recordamos que tiene una factura pendiente de pago:\n\n\
     Factura: {factura}\n\
     Fecha de vencimiento: {vence}\n\
     Saldo pendiente: {saldo}\n\n\
     {estado}\n\n\
     Agradecemos realizar el pago a la mayor brevedad posible. Si ya \
     realizó el pago, por favor haga caso omiso de este mensaje.\n\n\
     Cordialmente,\n\
     Lomarosa",
    nombre = reminder.customer,
    factura = reminder.invoice_number,
    vence = due_date_line(reminder),
    saldo = format_currency(reminder.balance),
    estado = status_line(reminder),
  )
}

fn html_body(reminder: &Reminder) -> String {
  let accent = match reminder.status {
    InvoiceStatus::Vencido => "#c0392b",
    InvoiceStatus::Proximo => "#e67e22",
  };
  format!(
    r#"<html>
  <body style="font-family: Arial, sans-serif; color: #333;">
    <p>Estimado/a <strong>{nombre}</strong>,</p>
    <p>Le recordamos que tiene una factura pendiente de pago:</p>
    <table style="border-collapse: collapse;">
      <tr><td style="padding: 4px 12px 4px 0;">Factura:</td>
          <td><strong>{factura}</strong></td></tr>
      <tr><td style="padding: 4px 12px 4px 0;">Fecha de vencimiento:</td>
          <td>{vence}</td></tr>
      <tr><td style="padding: 4px 12px 4px 0;">Saldo pendiente:</td>
          <td><strong>{saldo}</strong></td></tr>
    </table>
    <p style="color: {accent};"><strong>{estado}</strong></p>
    <p>Agradecemos realizar el pago a la mayor brevedad posible.
       Si ya realizó el pago, por favor haga caso omiso de este mensaje.</p>
    <p>Cordialmente,<br/>Lomarosa</p>
  </body>
</html>"#,
    nombre = reminder.customer,
    factura = reminder.invoice_number,
    vence = due_date_line(reminder),
    saldo = format_currency(reminder.balance),
    estado = status_line(reminder),
    accent = accent,
  )
}
