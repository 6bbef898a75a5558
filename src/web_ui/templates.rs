//! Template engine setup and HTML templates.

use once_cell::sync::Lazy;
use tera::{Context, Tera};

/// Global template engine instance with embedded templates.
///
/// Template names end in `.html`, so Tera autoescapes every variable.
pub static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();

    // Embed templates directly in the binary (no external files needed)
    if let Err(e) = tera.add_raw_templates(vec![
        ("base.html", BASE_TEMPLATE),
        ("list_chefs.html", LIST_CHEFS_TEMPLATE),
        ("select_dish.html", SELECT_DISH_TEMPLATE),
        ("chef_details.html", CHEF_DETAILS_TEMPLATE),
        ("chef_details_hint.html", CHEF_DETAILS_HINT_TEMPLATE),
        ("chefs.html", CHEFS_TEMPLATE),
        ("chef_form.html", CHEF_FORM_TEMPLATE),
        ("dishes.html", DISHES_TEMPLATE),
        ("dish_form.html", DISH_FORM_TEMPLATE),
        ("login.html", LOGIN_TEMPLATE),
        ("error.html", ERROR_TEMPLATE),
    ]) {
        tracing::error!("Failed to load templates: {:?}", e);
    }

    tera
});

/// Render a template with context
pub fn render(template: &str, context: &Context) -> Result<String, tera::Error> {
    TEMPLATES.render(template, context)
}

// =============================================================================
// Embedded Templates
// =============================================================================

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}Kitchen{% endblock %}</title>
    <style>
        :root {
            --bg: #faf7f2;
            --bg-card: #ffffff;
            --ink: #2b2118;
            --ink-soft: rgba(43, 33, 24, 0.7);
            --ink-faint: rgba(43, 33, 24, 0.45);
            --line: #e6ddd0;
            --accent: #b4462b;
            --danger: #a12b2b;
        }

        * { box-sizing: border-box; margin: 0; padding: 0; }

        body {
            font-family: Georgia, "Times New Roman", serif;
            background: var(--bg);
            color: var(--ink);
            line-height: 1.6;
        }

        a { color: var(--accent); text-decoration: none; }
        a:hover { text-decoration: underline; }

        .header { border-bottom: 1px solid var(--line); padding: 18px 32px; background: var(--bg-card); }
        .header-content {
            max-width: 1000px;
            margin: 0 auto;
            display: flex;
            align-items: center;
            justify-content: space-between;
        }
        .logo { font-size: 20px; font-weight: bold; color: var(--ink); }
        .nav { display: flex; gap: 24px; font-size: 15px; }
        .nav a { color: var(--ink-soft); }

        .container { max-width: 1000px; margin: 0 auto; padding: 40px 32px; }

        h1 { font-size: 30px; margin-bottom: 24px; }
        h2 { font-size: 18px; color: var(--ink-soft); margin: 24px 0 12px; }

        .card {
            background: var(--bg-card);
            border: 1px solid var(--line);
            border-radius: 10px;
            overflow: hidden;
        }
        .card-body { padding: 24px; }

        table { width: 100%; border-collapse: collapse; }
        th, td { text-align: left; padding: 12px 16px; border-bottom: 1px solid var(--line); }
        th { font-size: 13px; color: var(--ink-faint); text-transform: uppercase; letter-spacing: 0.04em; }
        tr:last-child td { border-bottom: none; }

        .list { list-style: none; }
        .list-item { padding: 14px 20px; border-bottom: 1px solid var(--line); }
        .list-item:last-child { border-bottom: none; }
        .list-item label { display: flex; gap: 12px; align-items: baseline; cursor: pointer; }

        .muted { color: var(--ink-faint); font-size: 14px; }
        .stars { color: var(--accent); letter-spacing: 2px; }

        .btn {
            display: inline-block;
            padding: 9px 18px;
            border-radius: 6px;
            border: 1px solid var(--accent);
            background: var(--accent);
            color: #fff;
            font-size: 15px;
            cursor: pointer;
        }
        .btn:hover { opacity: 0.9; text-decoration: none; }
        .btn-secondary { background: transparent; color: var(--accent); }
        .btn-danger { background: var(--danger); border-color: var(--danger); }
        .actions { display: flex; gap: 8px; }

        .form-row { margin-bottom: 16px; }
        .form-row label { display: block; font-size: 14px; color: var(--ink-soft); margin-bottom: 4px; }
        .form-row input, .form-row select, .form-row textarea {
            width: 100%;
            padding: 9px 12px;
            border: 1px solid var(--line);
            border-radius: 6px;
            font: inherit;
            background: #fff;
        }

        .alert {
            padding: 12px 16px;
            border-radius: 6px;
            margin-bottom: 20px;
            background: rgba(161, 43, 43, 0.08);
            border: 1px solid rgba(161, 43, 43, 0.3);
            color: var(--danger);
        }
        .notice {
            padding: 12px 16px;
            border-radius: 6px;
            margin-bottom: 20px;
            background: rgba(180, 70, 43, 0.06);
            border: 1px solid var(--line);
        }
        .empty { text-align: center; padding: 48px 24px; color: var(--ink-faint); }
        .mt-4 { margin-top: 16px; }
    </style>
</head>
<body>
    <header class="header">
        <div class="header-content">
            <a href="/" class="logo">Kitchen</a>
            <nav class="nav">
                <a href="/listChefs">Pick a chef</a>
                <a href="/chefs">Chefs</a>
                <a href="/dishes">Dishes</a>
                {% if current_user %}
                <span class="muted">{{ current_user }}</span>
                <a href="/logout">Log out</a>
                {% else %}
                <a href="/login">Log in</a>
                {% endif %}
            </nav>
        </div>
    </header>
    <main class="container">
        {% block content %}{% endblock %}
    </main>
</body>
</html>"##;

const LIST_CHEFS_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Choose a chef - Kitchen{% endblock %}
{% block content %}
<h1>Choose a chef</h1>

{% if chefs %}
<form method="POST" action="/dish">
    <div class="card">
        <ul class="list">
            {% for chef in chefs %}
            <li class="list-item">
                <label>
                    <input type="radio" name="chefId" value="{{ chef.id }}" {% if loop.first %}checked{% endif %}>
                    <span>
                        <strong>{{ chef.first_name }} {{ chef.last_name }}</strong>
                        <span class="muted">{{ chef.bio }}</span>
                    </span>
                </label>
            </li>
            {% endfor %}
        </ul>
    </div>
    <button type="submit" class="btn mt-4">Next: choose a dish</button>
</form>
{% else %}
<div class="card"><div class="empty">No chefs yet</div></div>
{% endif %}
{% endblock %}"##;

const SELECT_DISH_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Choose a dish - Kitchen{% endblock %}
{% block content %}
<h1>Choose a dish for {{ selected_chef.first_name }} {{ selected_chef.last_name }}</h1>

{% if dishes %}
<form method="POST" action="/chefDetails">
    <input type="hidden" name="chefId" value="{{ selected_chef.id }}">
    <div class="card">
        <ul class="list">
            {% for dish in dishes %}
            <li class="list-item">
                <label>
                    <input type="radio" name="dishId" value="{{ dish.dish_id }}" {% if loop.first %}checked{% endif %}>
                    <span>
                        <strong>{{ dish.name }}</strong>
                        <span class="muted">{{ dish.cuisine }}, {{ dish.preparation_time }} min{% if dish.chef_name %}, by {{ dish.chef_name }}{% endif %}</span>
                    </span>
                </label>
            </li>
            {% endfor %}
        </ul>
    </div>
    <div class="actions mt-4">
        <a href="/listChefs" class="btn btn-secondary">Back</a>
        <button type="submit" class="btn">Add dish to chef</button>
    </div>
</form>
{% else %}
<div class="card"><div class="empty">No dishes to choose from</div></div>
{% endif %}
{% endblock %}"##;

const CHEF_DETAILS_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ chef.first_name }} {{ chef.last_name }} - Kitchen{% endblock %}
{% block content %}
<h1>{{ chef.first_name }} {{ chef.last_name }}</h1>

{% if attached %}
<div class="notice">Added dish <strong>{{ attached }}</strong> to this chef.</div>
{% endif %}

<div class="card">
    <div class="card-body">
        <p>{{ chef.bio }}</p>
    </div>
</div>

<h2>Dishes ({{ dishes | length }})</h2>
<div class="card">
    {% if dishes %}
    <table>
        <tr><th>ID</th><th>Name</th><th>Cuisine</th><th>Time</th><th>Rating</th></tr>
        {% for dish in dishes %}
        <tr>
            <td>{{ dish.dish_id }}</td>
            <td>{{ dish.name }}</td>
            <td>{{ dish.cuisine }}</td>
            <td>{{ dish.preparation_time }} min</td>
            <td>{% if dish.rating %}<span class="stars">{{ dish.stars }}</span>{% else %}<span class="muted">unrated</span>{% endif %}</td>
        </tr>
        {% endfor %}
    </table>
    {% else %}
    <div class="empty">This chef has no dishes yet</div>
    {% endif %}
</div>

<div class="actions mt-4">
    <a href="/listChefs" class="btn btn-secondary">Back to chefs</a>
</div>
{% endblock %}"##;

const CHEF_DETAILS_HINT_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Chef details - Kitchen{% endblock %}
{% block content %}
<h1>Chef details</h1>
<div class="card">
    <div class="card-body">
        <p>Please select a chef and a dish from the main page.</p>
        <a href="/listChefs" class="btn mt-4">Go to chef list</a>
    </div>
</div>
{% endblock %}"##;

const CHEFS_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Chefs - Kitchen{% endblock %}
{% block content %}
<h1>Chefs</h1>

{% if error %}<div class="alert">{{ error }}</div>{% endif %}

{% if most_popular %}
<div class="notice">
    Most popular chef: <strong>{{ most_popular.chef.first_name }} {{ most_popular.chef.last_name }}</strong>
    <span class="muted">({{ most_popular.dish_count }} dishes)</span>
</div>
{% endif %}

<div class="card">
    {% if chefs %}
    <table>
        <tr><th>Name</th><th>Bio</th><th>Dishes</th>{% if is_admin %}<th></th>{% endif %}</tr>
        {% for summary in chefs %}
        <tr>
            <td><a href="/chefs/details/{{ summary.chef.id }}">{{ summary.chef.first_name }} {{ summary.chef.last_name }}</a></td>
            <td class="muted">{{ summary.chef.bio }}</td>
            <td>{{ summary.dish_count }}</td>
            {% if is_admin %}
            <td class="actions">
                <a href="/chefs/chef-form/{{ summary.chef.id }}" class="btn btn-secondary">Edit</a>
                <form method="POST" action="/chefs/delete/{{ summary.chef.id }}">
                    <button type="submit" class="btn btn-danger">Delete</button>
                </form>
            </td>
            {% endif %}
        </tr>
        {% endfor %}
    </table>
    {% else %}
    <div class="empty">No chefs yet</div>
    {% endif %}
</div>

{% if is_admin %}
<a href="/chefs/chef-form" class="btn mt-4">Add chef</a>
{% endif %}
{% endblock %}"##;

const CHEF_FORM_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ title }} - Kitchen{% endblock %}
{% block content %}
<h1>{{ title }}</h1>

{% if error %}<div class="alert">{{ error }}</div>{% endif %}

<form method="POST" action="{{ action }}" class="card">
    <div class="card-body">
        <div class="form-row">
            <label for="firstName">First name</label>
            <input id="firstName" name="firstName" value="{{ form.first_name }}" required>
        </div>
        <div class="form-row">
            <label for="lastName">Last name</label>
            <input id="lastName" name="lastName" value="{{ form.last_name }}" required>
        </div>
        <div class="form-row">
            <label for="bio">Bio</label>
            <textarea id="bio" name="bio" rows="4" maxlength="1000">{{ form.bio }}</textarea>
        </div>
        <div class="actions">
            <a href="/chefs" class="btn btn-secondary">Cancel</a>
            <button type="submit" class="btn">Save</button>
        </div>
    </div>
</form>
{% endblock %}"##;

const DISHES_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Dishes - Kitchen{% endblock %}
{% block content %}
<h1>Dishes</h1>

{% if error %}<div class="alert">{{ error }}</div>{% endif %}

<form method="GET" action="/dishes" class="actions" style="margin-bottom: 20px;">
    <select name="rating">
        <option value="">Any rating</option>
        {% for option in rating_options %}
        <option value="{{ option.value }}" {% if option.selected %}selected{% endif %}>{{ option.value }} stars</option>
        {% endfor %}
    </select>
    <select name="chefId">
        <option value="">Any chef</option>
        {% for option in chef_options %}
        <option value="{{ option.id }}" {% if option.selected %}selected{% endif %}>{{ option.label }}</option>
        {% endfor %}
    </select>
    <button type="submit" class="btn btn-secondary">Filter</button>
</form>

<div class="card">
    {% if dishes %}
    <table>
        <tr><th>ID</th><th>Name</th><th>Cuisine</th><th>Time</th><th>Rating</th><th>Chef</th>{% if is_admin %}<th></th>{% endif %}</tr>
        {% for dish in dishes %}
        <tr>
            <td>{{ dish.dish_id }}</td>
            <td>{{ dish.name }}</td>
            <td>{{ dish.cuisine }}</td>
            <td>{{ dish.preparation_time }} min</td>
            <td>{% if dish.rating %}<span class="stars">{{ dish.stars }}</span>{% else %}<span class="muted">unrated</span>{% endif %}</td>
            <td>{% if dish.chef_name %}{{ dish.chef_name }}{% else %}<span class="muted">none</span>{% endif %}</td>
            {% if is_admin %}
            <td class="actions">
                <a href="/dishes/dish-form/{{ dish.id }}" class="btn btn-secondary">Edit</a>
                <form method="POST" action="/dishes/delete/{{ dish.id }}">
                    <button type="submit" class="btn btn-danger">Delete</button>
                </form>
            </td>
            {% endif %}
        </tr>
        {% endfor %}
    </table>
    {% else %}
    <div class="empty">No dishes match</div>
    {% endif %}
</div>

{% if is_admin %}
<a href="/dishes/dish-form" class="btn mt-4">Add dish</a>
{% endif %}
{% endblock %}"##;

const DISH_FORM_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ title }} - Kitchen{% endblock %}
{% block content %}
<h1>{{ title }}</h1>

{% if error %}<div class="alert">{{ error }}</div>{% endif %}

<form method="POST" action="{{ action }}" class="card">
    <div class="card-body">
        <div class="form-row">
            <label for="dishId">Dish ID</label>
            <input id="dishId" name="dishId" value="{{ form.dish_id }}" required>
        </div>
        <div class="form-row">
            <label for="name">Name</label>
            <input id="name" name="name" value="{{ form.name }}" required>
        </div>
        <div class="form-row">
            <label for="cuisine">Cuisine</label>
            <input id="cuisine" name="cuisine" value="{{ form.cuisine }}">
        </div>
        <div class="form-row">
            <label for="preparationTime">Preparation time (minutes)</label>
            <input id="preparationTime" name="preparationTime" type="number" min="0" value="{{ form.preparation_time }}" required>
        </div>
        <div class="form-row">
            <label for="rating">Rating</label>
            <select id="rating" name="rating">
                <option value="">Unrated</option>
                {% for option in rating_options %}
                <option value="{{ option.value }}" {% if option.selected %}selected{% endif %}>{{ option.value }} stars</option>
                {% endfor %}
            </select>
        </div>
        <div class="form-row">
            <label for="chefId">Chef</label>
            <select id="chefId" name="chefId">
                <option value="">No chef</option>
                {% for option in chef_options %}
                <option value="{{ option.id }}" {% if option.selected %}selected{% endif %}>{{ option.label }}</option>
                {% endfor %}
            </select>
        </div>
        <div class="actions">
            <a href="/dishes" class="btn btn-secondary">Cancel</a>
            <button type="submit" class="btn">Save</button>
        </div>
    </div>
</form>
{% endblock %}"##;

const LOGIN_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Log in - Kitchen{% endblock %}
{% block content %}
<h1>Log in</h1>

{% if error %}<div class="alert">{{ error }}</div>{% endif %}

<form method="POST" action="/login" class="card" style="max-width: 420px;">
    <div class="card-body">
        <div class="form-row">
            <label for="username">Username</label>
            <input id="username" name="username" autocomplete="username" required>
        </div>
        <div class="form-row">
            <label for="password">Password</label>
            <input id="password" name="password" type="password" autocomplete="current-password" required>
        </div>
        <button type="submit" class="btn">Log in</button>
    </div>
</form>
{% endblock %}"##;

const ERROR_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Error - Kitchen{% endblock %}
{% block content %}
<div class="card">
    <div class="card-body" style="text-align: center; padding: 48px;">
        <h1 style="margin-bottom: 16px;">Something went wrong</h1>
        <p class="muted">{{ message }}</p>
        <a href="/listChefs" class="btn btn-secondary mt-4">Return to chefs</a>
    </div>
</div>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_load() {
        let names: Vec<&str> = TEMPLATES.get_template_names().collect();
        assert_eq!(names.len(), 11);
        assert!(names.contains(&"dish_form.html"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let mut context = Context::new();
        context.insert("message", "<script>alert(1)</script>");
        let html = render("error.html", &context).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }
}
