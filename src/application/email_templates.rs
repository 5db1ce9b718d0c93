use crate::domain::entities::waitlist_user::UserType;

const BRAND_NAME: &str = "Purrfect Stays";

pub fn primary_button(url: &str, label: &str) -> String {
    format!(
        r#"<a href="{url}" style="display:inline-block;padding:12px 18px;background-color:#1e3a5f;color:#ffffff;text-decoration:none;border-radius:8px;font-weight:600;">{label}</a>"#
    )
}

fn wrap_email(headline: &str, lead: &str, body: &str, reason: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="margin:0;padding:0;background-color:#f3f4f6;font-family:Arial,Helvetica,sans-serif;">
    <div style="max-width:560px;margin:0 auto;padding:32px 24px;">
      <div style="background:#ffffff;border-radius:12px;padding:32px;">
        <p style="margin:0 0 16px;font-size:14px;color:#6b7280;">{BRAND_NAME}</p>
        <h1 style="margin:0 0 8px;font-size:22px;color:#111827;">{headline}</h1>
        <p style="margin:0;color:#374151;">{lead}</p>
        {body}
      </div>
      <p style="margin:16px 0 0;font-size:12px;color:#9ca3af;">You received this email because {reason}.</p>
    </div>
  </body>
</html>"#
    )
}

pub fn verification_email(name: &str, verify_url: &str) -> (String, String) {
    let subject = format!("Verify your email for {}", BRAND_NAME);
    let headline = "Confirm your email address";
    let lead = format!(
        "Hi {}, you're almost on the {} waitlist. Click the button below to verify your email address.",
        name, BRAND_NAME
    );
    let button = primary_button(verify_url, "Verify my email");
    let body = format!(
        r#"{button}<p style="margin:12px 0 0;color:#374151;">The link is single-use. If the button doesn't work, copy this address into your browser:<br><span style="color:#6b7280;word-break:break-all;">{verify_url}</span></p>"#
    );
    let reason = format!("you signed up for the {} waitlist", BRAND_NAME);

    let html = wrap_email(headline, &lead, &body, &reason);
    (subject, html)
}

pub fn welcome_email(name: &str, position: i64, user_type: UserType) -> (String, String) {
    let subject = format!("Welcome to {}, you're #{} in line", BRAND_NAME, position);
    let headline = "You're on the list!";
    let lead = format!(
        "Thanks {}, your spot on the {} waitlist is confirmed. You're currently <strong>#{}</strong> in the queue.",
        name, BRAND_NAME, position
    );
    let audience_note = match user_type {
        UserType::CatParent => {
            "<p style=\"margin:12px 0 0;color:#374151;\">We'll let you know as soon as catteries near you open for early access bookings.</p>"
        }
        UserType::CatteryOwner => {
            "<p style=\"margin:12px 0 0;color:#374151;\">We'll reach out with onboarding details so your cattery is listed before we open to cat parents.</p>"
        }
    };
    let reason = format!("you completed the {} qualification quiz", BRAND_NAME);

    let html = wrap_email(headline, &lead, audience_note, &reason);
    (subject, html)
}
