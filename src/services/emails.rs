use {
    crate::config::OrgProfile,
    crate::domain::money::{Currency, MoneyAmount},
    crate::domain::order::{Order, OrderItem, PaymentStatus},
};

/// Regulatory text for donation receipts. Must be emitted verbatim on every
/// confirmation sent by the registered non-profit seller.
pub const TAX_DEDUCTIBLE_NOTICE: &str = "Only the portion of your payment that exceeds the \
fair market value of the goods you received is tax-deductible as a charitable contribution.";

const DELIVERY_ESTIMATE_NOTE: &str =
    "Delivery estimates are provided by the carrier and are not guaranteed.";

#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

fn money(amount: MoneyAmount, currency: Currency) -> String {
    format!("{}{}", currency.symbol(), amount.to_decimal_string())
}

/// Visual shell shared by all four templates: dark card, gradient header,
/// common footer with the support address.
fn shell(heading: &str, body: &str, org: &OrgProfile) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="margin: 0; padding: 24px; background: #111827; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;">
<div style="max-width: 600px; margin: 0 auto; background: #1f2937; border-radius: 12px; overflow: hidden;">
<div style="background: linear-gradient(135deg, #7c3aed, #db2777); padding: 28px 32px;">
<h1 style="margin: 0; color: #ffffff; font-size: 22px;">{heading}</h1>
</div>
<div style="padding: 32px; color: #e5e7eb;">
{body}
</div>
<div style="padding: 20px 32px; border-top: 1px solid #374151; color: #9ca3af; font-size: 12px;">
<p style="margin: 0 0 4px 0;">Questions? Reach us at <a href="mailto:{support}" style="color: #a78bfa;">{support}</a></p>
<p style="margin: 0;">{org_name} &middot; {org_address}</p>
</div>
</div>
</body>
</html>"#,
        heading = heading,
        body = body,
        support = org.support_email,
        org_name = org.name,
        org_address = org.address,
    )
}

fn address_block(order: &Order) -> String {
    let ship = &order.shipping;
    if ship.is_empty() {
        return String::new();
    }
    let mut lines = Vec::new();
    if let Some(name) = &ship.name {
        lines.push(name.clone());
    }
    if let Some(line1) = &ship.line1 {
        lines.push(line1.clone());
    }
    if let Some(line2) = &ship.line2 {
        lines.push(line2.clone());
    }
    let mut locality = String::new();
    if let Some(city) = &ship.city {
        locality.push_str(city);
    }
    if let Some(state) = &ship.state {
        if !locality.is_empty() {
            locality.push_str(", ");
        }
        locality.push_str(state);
    }
    if let Some(postal) = &ship.postal_code {
        if !locality.is_empty() {
            locality.push(' ');
        }
        locality.push_str(postal);
    }
    if !locality.is_empty() {
        lines.push(locality);
    }
    if let Some(country) = &ship.country {
        lines.push(country.clone());
    }

    format!(
        r#"<div style="background: #111827; border-radius: 8px; padding: 16px; margin: 16px 0;">
<p style="margin: 0 0 6px 0; color: #9ca3af; font-size: 12px; text-transform: uppercase;">Shipping to</p>
<p style="margin: 0; line-height: 1.5;">{}</p>
</div>"#,
        lines.join("<br>"),
    )
}

fn items_table(items: &[OrderItem], currency: Currency) -> String {
    let rows: String = items
        .iter()
        .map(|item| {
            format!(
                r#"<tr>
<td style="padding: 8px 0; border-bottom: 1px solid #374151;">{title}</td>
<td style="padding: 8px 0; border-bottom: 1px solid #374151; text-align: center;">{qty}</td>
<td style="padding: 8px 0; border-bottom: 1px solid #374151; text-align: right;">{unit}</td>
<td style="padding: 8px 0; border-bottom: 1px solid #374151; text-align: right;">{total}</td>
</tr>"#,
                title = item.title,
                qty = item.quantity,
                unit = money(item.unit_price, currency),
                total = money(item.total_price, currency),
            )
        })
        .collect();

    format!(
        r#"<table style="width: 100%; border-collapse: collapse; margin: 16px 0; font-size: 14px;">
<tr style="color: #9ca3af; font-size: 12px; text-transform: uppercase;">
<th style="text-align: left; padding-bottom: 8px;">Item</th>
<th style="text-align: center; padding-bottom: 8px;">Qty</th>
<th style="text-align: right; padding-bottom: 8px;">Price</th>
<th style="text-align: right; padding-bottom: 8px;">Total</th>
</tr>
{rows}
</table>"#,
    )
}

fn totals_block(order: &Order) -> String {
    let c = order.currency;
    let mut rows = format!(
        r#"<tr><td style="padding: 4px 0; color: #9ca3af;">Subtotal</td><td style="padding: 4px 0; text-align: right;">{}</td></tr>
<tr><td style="padding: 4px 0; color: #9ca3af;">Shipping</td><td style="padding: 4px 0; text-align: right;">{}</td></tr>"#,
        money(order.subtotal, c),
        money(order.shipping_cost, c),
    );
    if order.discount.cents() > 0 {
        rows.push_str(&format!(
            r#"<tr><td style="padding: 4px 0; color: #9ca3af;">Discount</td><td style="padding: 4px 0; text-align: right;">&minus;{}</td></tr>"#,
            money(order.discount, c),
        ));
    }
    rows.push_str(&format!(
        r#"<tr><td style="padding: 8px 0; font-weight: bold;">Total</td><td style="padding: 8px 0; text-align: right; font-weight: bold;">{}</td></tr>"#,
        money(order.total, c),
    ));
    format!(r#"<table style="width: 100%; border-collapse: collapse; font-size: 14px;">{rows}</table>"#)
}

/// Order confirmation + donation receipt.
pub fn confirmation_email(order: &Order, items: &[OrderItem], org: &OrgProfile) -> RenderedEmail {
    let greeting = order
        .contact
        .name
        .as_deref()
        .map(|n| format!("Thanks, {n}!"))
        .unwrap_or_else(|| "Thank you for your order!".to_string());

    let body = format!(
        r#"<p style="margin: 0 0 8px 0; font-size: 16px;">{greeting}</p>
<p style="margin: 0 0 16px 0; color: #9ca3af;">Order <strong style="color: #e5e7eb;">{order_ref}</strong> is confirmed and being prepared.</p>
{address}
{items}
{totals}
<div style="background: #111827; border-left: 3px solid #a78bfa; border-radius: 8px; padding: 16px; margin-top: 20px; font-size: 13px;">
<p style="margin: 0 0 6px 0; font-weight: bold;">Donation receipt</p>
<p style="margin: 0 0 6px 0;">{legal_name} is a registered non-profit organization. Tax ID: {tax_id}.</p>
<p style="margin: 0; color: #9ca3af;">{tax_notice}</p>
</div>"#,
        greeting = greeting,
        order_ref = order.id,
        address = address_block(order),
        items = items_table(items, order.currency),
        totals = totals_block(order),
        legal_name = org.legal_name,
        tax_id = org.tax_id,
        tax_notice = TAX_DEDUCTIBLE_NOTICE,
    );

    RenderedEmail {
        subject: format!("Your {} order is confirmed", org.name),
        html: shell("Order confirmed", &body, org),
    }
}

/// Shipping notice: tracking number always shown, tracking link only when
/// the carrier gave us one.
pub fn shipping_email(
    order: &Order,
    org: &OrgProfile,
    tracking_number: &str,
    tracking_url: Option<&str>,
) -> RenderedEmail {
    let tracking_button = tracking_url
        .map(|url| {
            format!(
                r#"<p style="margin: 16px 0;"><a href="{url}" style="display: inline-block; background: #7c3aed; color: #ffffff; padding: 10px 20px; border-radius: 6px; text-decoration: none;">Track your package</a></p>"#,
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<p style="margin: 0 0 16px 0; font-size: 16px;">Good news &mdash; your order is on the way.</p>
<div style="background: #111827; border-radius: 8px; padding: 16px;">
<p style="margin: 0 0 4px 0; color: #9ca3af; font-size: 12px; text-transform: uppercase;">Tracking number</p>
<p style="margin: 0; font-size: 18px; letter-spacing: 1px;">{tracking_number}</p>
</div>
{tracking_button}
{address}
<p style="margin: 16px 0 0 0; color: #9ca3af; font-size: 12px;">{note}</p>"#,
        tracking_number = tracking_number,
        tracking_button = tracking_button,
        address = address_block(order),
        note = DELIVERY_ESTIMATE_NOTE,
    );

    RenderedEmail {
        subject: format!("Your {} order has shipped", org.name),
        html: shell("On the way", &body, org),
    }
}

/// Refund notice. Wording branches on full vs partial; the reason line only
/// renders when one was supplied.
pub fn refund_email(
    order: &Order,
    org: &OrgProfile,
    amount: MoneyAmount,
    is_full: bool,
    reason: Option<&str>,
) -> RenderedEmail {
    let lead = if is_full {
        "Your order has been refunded in full."
    } else {
        "A partial refund has been issued for your order."
    };
    let reason_line = reason
        .map(|r| format!(r#"<p style="margin: 16px 0 0 0; color: #9ca3af;">Reason: {r}</p>"#))
        .unwrap_or_default();

    let body = format!(
        r#"<p style="margin: 0 0 16px 0; font-size: 16px;">{lead}</p>
<div style="background: #111827; border-radius: 8px; padding: 16px; text-align: center;">
<p style="margin: 0 0 4px 0; color: #9ca3af; font-size: 12px; text-transform: uppercase;">Refund amount</p>
<p style="margin: 0; font-size: 26px; font-weight: bold; color: #34d399;">{amount}</p>
</div>
{reason_line}
<p style="margin: 16px 0 0 0; color: #9ca3af; font-size: 13px;">Refunds usually appear on your statement within 5&ndash;10 business days.</p>"#,
        lead = lead,
        amount = money(amount, order.currency),
        reason_line = reason_line,
    );

    RenderedEmail {
        subject: if is_full {
            format!("Your {} order was refunded", org.name)
        } else {
            format!("A refund was issued on your {} order", org.name)
        },
        html: shell("Refund issued", &body, org),
    }
}

/// Cancellation notice: original total struck through; points at the
/// separate refund email when payment was already captured.
pub fn cancellation_email(order: &Order, org: &OrgProfile) -> RenderedEmail {
    let refund_note = if order.payment_status == PaymentStatus::Paid {
        r#"<p style="margin: 16px 0 0 0; color: #9ca3af;">Your payment was captured, so a separate refund confirmation will follow shortly.</p>"#
    } else {
        ""
    };

    let body = format!(
        r#"<p style="margin: 0 0 16px 0; font-size: 16px;">Your order has been cancelled.</p>
<div style="background: #111827; border-radius: 8px; padding: 16px; text-align: center;">
<p style="margin: 0 0 4px 0; color: #9ca3af; font-size: 12px; text-transform: uppercase;">Order total</p>
<p style="margin: 0; font-size: 22px;"><s style="color: #6b7280;">{total}</s></p>
</div>
{refund_note}"#,
        total = money(order.total, order.currency),
        refund_note = refund_note,
    );

    RenderedEmail {
        subject: format!("Your {} order was cancelled", org.name),
        html: shell("Order cancelled", &body, org),
    }
}
