// src/messages.rs

pub const WELCOME_SUBJECT: &str = "🚀 Welcome to Celestial Chaos Alpha - Your Steam Key Inside!";
pub const SENDER_NAME: &str = "Celestial Chaos Team";

pub const SIGNUP_SUCCESS: &str = "Successfully registered! Check your email for your Steam key.";
pub const MISSING_FIELDS: &str = "Name and email are required";
pub const ALREADY_REGISTERED: &str = "This email is already registered for alpha testing";
pub const NO_KEYS_LEFT: &str = "No Steam keys available at the moment. Please try again later.";
pub const SIGNUP_FAILED: &str = "An error occurred during signup. Please try again.";
pub const RESEND_SUCCESS: &str = "Welcome email sent again.";
pub const NOT_FOUND: &str = "Registration not found";

/// `"Display Name" <address>` header value for outgoing mail
pub fn sender_header(address: &str) -> String {
    format!("\"{}\" <{}>", SENDER_NAME, address)
}

/// Welcome email with the registrant's Steam key.
pub fn render_welcome(name: &str, steam_key: &str, contact_address: &str) -> String {
    let name = escape_html(name);
    let steam_key = escape_html(steam_key);
    let contact = escape_html(contact_address);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {{
            font-family: Arial, sans-serif;
            background-color: #0a0a1f;
            color: #E8F5FF;
            margin: 0;
            padding: 0;
        }}
        .container {{
            max-width: 600px;
            margin: 0 auto;
            padding: 40px 20px;
        }}
        .logo {{
            text-align: center;
            font-size: 32px;
            font-weight: bold;
            color: #00D9FF;
            letter-spacing: 3px;
            margin-bottom: 30px;
        }}
        .content {{
            background: rgba(107, 76, 230, 0.1);
            border: 2px solid #6B4CE6;
            border-radius: 15px;
            padding: 30px;
        }}
        .steam-key-box {{
            background: rgba(0, 217, 255, 0.1);
            border: 2px solid #00D9FF;
            border-radius: 10px;
            padding: 20px;
            margin: 20px 0;
            text-align: center;
        }}
        .steam-key {{
            font-size: 24px;
            font-weight: bold;
            color: #00D9FF;
            letter-spacing: 2px;
        }}
        .footer {{
            text-align: center;
            margin-top: 30px;
            color: #B8C5D6;
            font-size: 14px;
        }}
        h1 {{
            color: #00D9FF;
        }}
        p {{
            line-height: 1.6;
        }}
    </style>
</head>
<body>
    <div class="container">
        <div class="logo">CELESTIAL CHAOS</div>

        <div class="content">
            <h1>Welcome to the Alpha, {name}! 🚀</h1>

            <p>Thank you for joining the Celestial Chaos alpha testing program! We're thrilled to have you aboard as we prepare for our July 2026 launch.</p>

            <div class="steam-key-box">
                <p><strong>Your Steam Key:</strong></p>
                <div class="steam-key">{steam_key}</div>
                <p style="font-size: 14px;">Keep this key safe! It grants you access to the alpha build.</p>
            </div>

            <h2>How to Activate Your Key:</h2>
            <ol>
                <li>Open Steam and log into your account</li>
                <li>Click "Games" in the top menu</li>
                <li>Select "Activate a Product on Steam"</li>
                <li>Enter your key: <strong>{steam_key}</strong></li>
                <li>Download and start playing!</li>
            </ol>

            <h2>What's Next?</h2>
            <ul>
                <li><strong>Download the Game:</strong> After activating your key, the alpha build will appear in your Steam library</li>
                <li><strong>Share Feedback:</strong> We'll send you a feedback form to share your experiences</li>
                <li><strong>Stay Updated:</strong> You'll receive regular updates about new features and builds</li>
            </ul>

            <p>If you encounter any issues or have questions, reach out to us at <a href="mailto:{contact}" style="color: #00D9FF;">{contact}</a></p>

            <p><strong>- The Celestial Chaos Team</strong></p>
        </div>

        <div class="footer">
            <p>© 2026 Celestial Chaos. All rights reserved.</p>
            <p>You're receiving this email because you signed up for alpha testing.</p>
        </div>
    </div>
</body>
</html>"#,
        name = name,
        steam_key = steam_key,
        contact = contact
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
