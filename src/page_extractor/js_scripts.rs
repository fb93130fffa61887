//! JavaScript evaluation scripts
//!
//! The scripts only observe. They return plain JSON matching the structs in
//! [`super::snapshot`]; every classification happens on the Rust side.

/// Homepage snapshot, see [`super::DomSnapshot`]
pub const PAGE_SNAPSHOT_SCRIPT: &str = r#"
    (() => {
        const MAX_TOKENS = 5000;
        const MAX_CANDIDATES = 400;
        const scrollY = window.scrollY || 0;
        const scrollX = window.scrollX || 0;

        const rectOf = (el) => {
            const r = el.getBoundingClientRect();
            return { top: r.top + scrollY, left: r.left + scrollX, width: r.width, height: r.height };
        };
        const attr = (el, name) => (el.getAttribute && el.getAttribute(name)) || '';
        const classOf = (el) => {
            const c = el.className;
            if (typeof c === 'string') return c;
            return (c && c.baseVal) || '';
        };
        // images and root svgs inside the candidate's parent, the candidate included
        const iconSiblings = (el) => el.parentElement
            ? Array.from(el.parentElement.querySelectorAll('img, svg'))
                .filter(s => !s.parentElement || !s.parentElement.closest('svg')).length
            : 0;

        const footer = document.querySelector('footer, [role="contentinfo"], #footer, .footer, .site-footer');

        const links = Array.from(document.querySelectorAll('a[href]')).map(a => ({
            href: a.href || attr(a, 'href'),
            text: (a.innerText || a.textContent || '').trim().slice(0, 200)
        }));

        const bodyText = document.body ? (document.body.innerText || '') : '';

        const contactTexts = Array.from(document.querySelectorAll('[class*="contact" i], [id*="contact" i]'))
            .map(el => (el.innerText || el.textContent || '').trim())
            .filter(t => t.length > 0)
            .slice(0, 50);

        const mailtoHrefs = Array.from(document.querySelectorAll('a[href^="mailto:" i]'))
            .map(a => attr(a, 'href'));

        const tokens = new Set();
        for (const el of document.querySelectorAll('[class], [id]')) {
            if (tokens.size >= MAX_TOKENS) break;
            if (el.id) tokens.add(el.id);
            for (const c of classOf(el).split(/\s+/)) {
                if (c) tokens.add(c);
            }
        }

        const iframeSrcs = Array.from(document.querySelectorAll('iframe'))
            .map(f => f.src || attr(f, 'src') || f.id || '')
            .filter(s => s.length > 0);
        const scriptSrcs = Array.from(document.querySelectorAll('script[src]')).map(s => s.src);

        const seen = new Set();
        const candidates = [];
        const selectors = [
            'img',
            'svg',
            '[class*="payment" i] *',
            '[class*="trust" i] *',
            '[class*="badge" i] *',
            '[class*="secure" i] *',
            '[id*="payment" i] *',
            '[id*="trust" i] *'
        ];
        for (const el of document.querySelectorAll(selectors.join(','))) {
            if (candidates.length >= MAX_CANDIDATES) break;
            if (seen.has(el)) continue;
            const tag = el.tagName.toLowerCase();
            // nested svg parts are covered by their root svg
            if (el.closest('svg') && tag !== 'svg') continue;
            if (tag !== 'img' && tag !== 'svg' && el.children.length > 0) continue;
            seen.add(el);

            const markers = [];
            let parent = el.parentElement;
            for (let depth = 0; parent && depth < 5; depth++) {
                markers.push(classOf(parent), parent.id || '');
                parent = parent.parentElement;
            }

            const siblings = iconSiblings(el);

            candidates.push({
                tag,
                src: tag === 'img' ? (el.currentSrc || el.src || attr(el, 'data-src')) : attr(el, 'src'),
                alt: attr(el, 'alt'),
                title: attr(el, 'title') || (el.querySelector && el.querySelector('title') ? el.querySelector('title').textContent : ''),
                ariaLabel: attr(el, 'aria-label'),
                className: classOf(el),
                id: el.id || '',
                rect: rectOf(el),
                inFooter: footer ? footer.contains(el) : false,
                ancestorMarkers: markers.filter(m => m).join(' '),
                siblingIconCount: siblings,
                inCtaContainer: false
            });
        }

        return {
            finalUrl: window.location.href,
            viewportHeight: window.innerHeight,
            links,
            bodyText,
            htmlFallback: bodyText.trim().length === 0 ? document.documentElement.outerHTML : null,
            footerText: footer ? (footer.innerText || '') : '',
            contactTexts,
            mailtoHrefs,
            classIdTokens: Array.from(tokens),
            iframeSrcs,
            scriptSrcs,
            footer: footer ? rectOf(footer) : null,
            badgeCandidates: candidates
        };
    })()
"#;

/// Product-detail snapshot, see [`super::ProductSnapshot`]
pub const PRODUCT_SNAPSHOT_SCRIPT: &str = r#"
    (() => {
        const scrollY = window.scrollY || 0;
        const scrollX = window.scrollX || 0;
        const rectOf = (el) => {
            const r = el.getBoundingClientRect();
            return { top: r.top + scrollY, left: r.left + scrollX, width: r.width, height: r.height };
        };
        const attr = (el, name) => (el.getAttribute && el.getAttribute(name)) || '';
        const classOf = (el) => {
            const c = el.className;
            if (typeof c === 'string') return c;
            return (c && c.baseVal) || '';
        };
        // images and root svgs inside the candidate's parent, the candidate included
        const iconSiblings = (el) => el.parentElement
            ? Array.from(el.parentElement.querySelectorAll('img, svg'))
                .filter(s => !s.parentElement || !s.parentElement.closest('svg')).length
            : 0;
        const visible = (el) => {
            const r = el.getBoundingClientRect();
            return r.width > 0 && r.height > 0;
        };

        const CTA_TEXT = /(add to (cart|bag|basket)|buy (it )?now|purchase|checkout|pre-?order)/i;
        const controls = Array.from(document.querySelectorAll(
            'form[action*="/cart/add"] [type="submit"], button[name="add"], [data-add-to-cart], button, input[type="submit"], a[role="button"]'
        ));
        const cta = controls.find(el => visible(el) && CTA_TEXT.test((el.innerText || el.value || attr(el, 'aria-label') || '').trim()))
            || controls.find(el => visible(el) && el.closest('form[action*="/cart/add"]'))
            || null;
        const ctaContainer = cta ? (cta.closest('form, section, [class*="product" i]') || cta.parentElement) : null;

        const tokens = new Set();
        for (const el of document.querySelectorAll('[class], [id]')) {
            if (tokens.size >= 5000) break;
            if (el.id) tokens.add(el.id);
            for (const c of classOf(el).split(/\s+/)) {
                if (c) tokens.add(c);
            }
        }

        const candidates = [];
        for (const el of document.querySelectorAll('img, svg')) {
            if (candidates.length >= 400) break;
            const tag = el.tagName.toLowerCase();
            if (tag === 'svg' && el.parentElement && el.parentElement.closest('svg')) continue;
            const markers = [];
            let parent = el.parentElement;
            for (let depth = 0; parent && depth < 5; depth++) {
                markers.push(classOf(parent), parent.id || '');
                parent = parent.parentElement;
            }
            candidates.push({
                tag,
                src: tag === 'img' ? (el.currentSrc || el.src || attr(el, 'data-src')) : attr(el, 'src'),
                alt: attr(el, 'alt'),
                title: attr(el, 'title'),
                ariaLabel: attr(el, 'aria-label'),
                className: classOf(el),
                id: el.id || '',
                rect: rectOf(el),
                inFooter: !!el.closest('footer'),
                ancestorMarkers: markers.filter(m => m).join(' '),
                siblingIconCount: iconSiblings(el),
                inCtaContainer: ctaContainer ? ctaContainer.contains(el) : false
            });
        }

        const images = Array.from(document.querySelectorAll('img')).map(img => ({
            src: img.currentSrc || img.src || attr(img, 'data-src'),
            width: img.naturalWidth || img.width || 0,
            height: img.naturalHeight || img.height || 0
        }));

        return {
            finalUrl: window.location.href,
            viewportHeight: window.innerHeight,
            bodyText: document.body ? (document.body.innerText || '') : '',
            classIdTokens: Array.from(tokens),
            cta: cta ? rectOf(cta) : null,
            badgeCandidates: candidates,
            images
        };
    })()
"#;
