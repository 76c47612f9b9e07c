use gtk::gdk;
use gtk4 as gtk;

const CSS: &str = "
.dudley-window, .dudley-layer {
    background: none;
    background-color: transparent;
}
";

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    provider.load_from_data(CSS);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
